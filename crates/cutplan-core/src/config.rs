//! Machine limits and packing constants.

/// Longest piece the cutting machine can handle, in millimeters.
pub const MAX_MACHINE_SIZE: f64 = 3000.0;

/// Width of the synthetic roll used when infinite materials are requested.
pub const INFINITE_MATERIAL_WIDTH: f64 = 1250.0;

/// Spacing kept between neighbouring parts on a sheet.
pub const PADDING_DETAILS_ON_SHEET: f64 = 0.0;

/// Length of the synthetic roll: the largest integer an `f64` represents exactly.
pub const INFINITE_MATERIAL_LENGTH: f64 = 9_007_199_254_740_991.0;

/// Default number of memoized packer option sets.
pub const DEFAULT_PACKER_CACHE_CAPACITY: usize = 256;

/// Default ceiling on unit parts one request may expand into.
pub const DEFAULT_MAX_UNIT_PARTS: usize = 100_000;

/// Tunable limits for one optimizer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CuttingConfig {
    pub max_machine_size: f64,
    pub infinite_material_width: f64,
    pub padding: f64,
    /// Zero disables the packer options cache
    pub packer_cache_capacity: usize,
    /// Requests expanding into more unit parts than this are rejected
    pub max_unit_parts: usize,
}

impl Default for CuttingConfig {
    fn default() -> Self {
        Self {
            max_machine_size: MAX_MACHINE_SIZE,
            infinite_material_width: INFINITE_MATERIAL_WIDTH,
            padding: PADDING_DETAILS_ON_SHEET,
            packer_cache_capacity: DEFAULT_PACKER_CACHE_CAPACITY,
            max_unit_parts: DEFAULT_MAX_UNIT_PARTS,
        }
    }
}
