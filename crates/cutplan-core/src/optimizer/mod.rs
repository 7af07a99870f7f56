use crate::config::CuttingConfig;
use crate::error::Result;
use crate::types::*;
use crate::validate::check_unit_budget;
use tracing::{debug, info};

mod cache;
mod grouping;
mod materials;
mod normalize;
mod sections;
mod summary;
#[cfg(test)]
mod tests;

pub use cache::{PackerOptions, PackerOptionsCache};
pub use grouping::{group_parts, MaterialKey, PartGroup};
pub(crate) use normalize::unit_part_count;
pub use sections::{plan_section, SectionPlan};
pub use summary::calculate_utilization_rate;
use summary::create_optimization_result;

/// Plans cuts of parts from material sheets using section-wise rectangle packing.
///
/// All working state of a call is local to that call; the only state kept
/// between calls is the bounded packer options cache, which never affects
/// results.
#[derive(Debug, Clone)]
pub struct CuttingOptimizer {
    config: CuttingConfig,
    cache: PackerOptionsCache,
}

impl Default for CuttingOptimizer {
    fn default() -> Self {
        Self::new(CuttingConfig::default())
    }
}

impl CuttingOptimizer {
    pub fn new(config: CuttingConfig) -> Self {
        let cache = PackerOptionsCache::new(config.packer_cache_capacity);
        Self { config, cache }
    }

    pub fn config(&self) -> &CuttingConfig {
        &self.config
    }

    pub fn cached_packer_options(&self) -> usize {
        self.cache.len()
    }

    /// Executes the full flow: normalize, group, select materials, pack
    /// section by section, and aggregate the report.
    pub fn optimize_cutting(&mut self, input: &OptimizationInput) -> Result<OptimizationResult> {
        check_unit_budget(&input.parts, &self.config)?;

        let unit_parts = self.expand_parts(&input.parts);
        let total_units = unit_parts.len();
        let groups = group_parts(unit_parts);

        let mut sheets = Vec::new();
        let mut leftovers = Vec::new();

        for group in groups {
            let materials = self.select_materials(
                &group.key,
                input.available_materials.as_deref(),
                &input.options,
            );
            debug!(
                "Group {}/{}: {} parts, {} candidate materials",
                group.key.color,
                group.key.thickness,
                group.parts.len(),
                materials.len()
            );

            let remaining = self.optimize_parts(group.parts, &materials, &input.options, &mut sheets)?;
            leftovers.extend(remaining);
        }

        let unplaced = self.consolidate_unplaced(&leftovers);
        let result = create_optimization_result(sheets, unplaced);

        info!(
            "Cutting plan: {} sheets, {}/{} parts placed, {:.2}% utilization",
            result.sheets.len(),
            total_units - leftovers.len(),
            total_units,
            result.utilization_rate
        );

        Ok(result)
    }
}

/// Runs one optimization with default machine limits.
pub fn optimize_cutting(input: &OptimizationInput) -> Result<OptimizationResult> {
    CuttingOptimizer::default().optimize_cutting(input)
}
