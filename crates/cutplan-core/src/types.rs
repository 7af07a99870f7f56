use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Part requested by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRequest {
    pub id: String,
    pub length: f64,
    pub width: f64,
    pub color: String,
    pub thickness: f64,
    pub quantity: u32,
    pub can_rotate: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// Material sheet or roll available for cutting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSheet {
    pub id: String,
    pub length: f64,
    pub width: f64,
    pub color: String,
    pub thickness: f64,
    pub available_quantity: u32,
}

/// Optimization switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOptions {
    /// Pack every group from a synthetic roll of unbounded length
    #[serde(default)]
    pub use_infinite_materials: bool,
    /// Best-area-fit placement when set, first-fit otherwise
    #[serde(default = "default_smart_pack")]
    pub smart_pack: bool,
    #[serde(default)]
    pub min_waste: bool,
    #[serde(default)]
    pub max_utilization: bool,
}

fn default_smart_pack() -> bool {
    true
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            use_infinite_materials: false,
            smart_pack: true,
            min_waste: false,
            max_utilization: false,
        }
    }
}

/// Input: What the caller provides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationInput {
    pub parts: Vec<PartRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_materials: Option<Vec<MaterialSheet>>,
    #[serde(default)]
    pub options: OptimizationOptions,
}

/// One physical instance of a requested part, ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPart {
    pub id: String,
    pub original_id: String,
    /// Copy index within the requested quantity
    pub instance: u32,
    /// Fragment index when the request was split, `None` otherwise
    pub segment: Option<u32>,
    pub split_group_id: Option<String>,
    pub length: f64,
    pub width: f64,
    pub color: String,
    pub thickness: f64,
    pub can_rotate: bool,
    pub label: String,
    pub description: String,
}

impl UnitPart {
    pub fn longer_side(&self) -> f64 {
        self.length.max(self.width)
    }

    pub fn shorter_side(&self) -> f64 {
        self.length.min(self.width)
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Part placed on a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPart {
    pub id: String,
    pub length: f64,
    pub width: f64,
    pub x: f64,
    pub y: f64,
    pub square: f64,
    pub rotated: bool,
    pub color: String,
    pub thickness: f64,
    pub label: String,
    pub description: String,
    pub original_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_group_id: Option<String>,
}

/// Unused area of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetWaste {
    pub square: f64,
    pub utilization_rate: f64,
}

/// Layout of a single section cut from a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResult {
    /// Section identifier, `<materialId>_<n>`
    pub id: String,
    pub material_id: String,
    /// Physical copy of the material this section was cut from (1-based)
    pub sheet_number: u32,
    /// Cut-line position where the section starts along the material length
    pub offset: f64,
    pub length: f64,
    pub width: f64,
    pub color: String,
    pub thickness: f64,
    pub parts: Vec<PlacedPart>,
    pub waste: SheetWaste,
}

/// Waste total for one (color, thickness) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteEntry {
    pub color: String,
    pub thickness: f64,
    pub square: f64,
}

/// Why a part ended up unplaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    ExceedsMachineDimensions,
    NoMatchingMaterial,
}

impl UnplacedReason {
    pub fn message(&self) -> &'static str {
        match self {
            UnplacedReason::ExceedsMachineDimensions => "exceeds machine dimensions",
            UnplacedReason::NoMatchingMaterial => "no matching material found",
        }
    }
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Parts of one request that could not be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedPartInfo {
    /// Id of the original request
    pub id: String,
    pub length: f64,
    pub width: f64,
    pub color: String,
    pub thickness: f64,
    pub quantity: u32,
    /// Total area of all unplaced units
    pub square: f64,
    pub reason: UnplacedReason,
    pub message: String,
}

/// Output: What the optimizer returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub sheets: Vec<SheetResult>,
    pub total_waste: f64,
    /// Waste per (color, thickness)
    pub waste: Vec<WasteEntry>,
    pub utilization_rate: f64,
    pub total_material_area: f64,
    /// How many physical copies of each material were started
    pub materials_required: BTreeMap<String, u32>,
    pub unplaced_parts: Vec<UnplacedPartInfo>,
    pub is_complete: bool,
}

/// Bounded-length slice of a material handed to the packer in one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSection {
    /// `<materialId>_<n>`
    pub id: String,
    pub material_id: String,
    pub sheet_number: u32,
    pub offset: f64,
    pub length: f64,
    pub width: f64,
    pub color: String,
    pub thickness: f64,
}
