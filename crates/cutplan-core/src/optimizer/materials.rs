use super::*;
use crate::config::INFINITE_MATERIAL_LENGTH;

impl CuttingOptimizer {
    /// Candidate materials for a group, in the order they will be consumed.
    pub fn select_materials(
        &self,
        key: &MaterialKey,
        available: Option<&[MaterialSheet]>,
        options: &OptimizationOptions,
    ) -> Vec<MaterialSheet> {
        if options.use_infinite_materials {
            return vec![self.infinite_material(key)];
        }

        available
            .unwrap_or_default()
            .iter()
            .filter(|material| key.matches(&material.color, material.thickness))
            .cloned()
            .collect()
    }

    /// Synthetic roll of fixed width and practically unbounded length.
    pub(super) fn infinite_material(&self, key: &MaterialKey) -> MaterialSheet {
        MaterialSheet {
            id: format!("infinite_{}_{}", key.color, key.thickness),
            length: INFINITE_MATERIAL_LENGTH,
            width: self.config.infinite_material_width,
            color: key.color.clone(),
            thickness: key.thickness,
            available_quantity: 1,
        }
    }
}
