use super::*;
use std::collections::{BTreeMap, HashMap};

impl CuttingOptimizer {
    /// Builds a sheet result with its waste statistics.
    pub(super) fn create_sheet_result(&self, section: &MaterialSection, parts: Vec<PlacedPart>) -> SheetResult {
        let sheet_area = section.length * section.width;
        let used_area: f64 = parts.iter().map(|p| p.square).sum();
        let utilization_rate = if sheet_area > 0.0 {
            (used_area / sheet_area) * 100.0
        } else {
            0.0
        };

        SheetResult {
            id: section.id.clone(),
            material_id: section.material_id.clone(),
            sheet_number: section.sheet_number,
            offset: section.offset,
            length: section.length,
            width: section.width,
            color: section.color.clone(),
            thickness: section.thickness,
            parts,
            waste: SheetWaste {
                square: sheet_area - used_area,
                utilization_rate,
            },
        }
    }

    /// Collapses leftover unit parts into one record per original request.
    pub(super) fn consolidate_unplaced(&self, parts: &[UnitPart]) -> Vec<UnplacedPartInfo> {
        let mut consolidated: Vec<UnplacedPartInfo> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for part in parts {
            match index.get(part.original_id.as_str()) {
                Some(&slot) => {
                    let info = &mut consolidated[slot];
                    info.quantity += 1;
                    info.square += part.area();
                }
                None => {
                    let reason = self.unplaced_reason(part);
                    index.insert(part.original_id.as_str(), consolidated.len());
                    consolidated.push(UnplacedPartInfo {
                        id: part.original_id.clone(),
                        length: part.length,
                        width: part.width,
                        color: part.color.clone(),
                        thickness: part.thickness,
                        quantity: 1,
                        square: part.area(),
                        reason,
                        message: reason.message().to_string(),
                    });
                }
            }
        }

        consolidated
    }

    fn unplaced_reason(&self, part: &UnitPart) -> UnplacedReason {
        let max = self.config.max_machine_size;
        if part.length > max || part.width > max {
            UnplacedReason::ExceedsMachineDimensions
        } else {
            UnplacedReason::NoMatchingMaterial
        }
    }
}

/// Overall share of material area covered by placed parts, in percent.
pub fn calculate_utilization_rate(sheets: &[SheetResult]) -> f64 {
    if sheets.is_empty() {
        return 0.0;
    }

    let total_area: f64 = sheets.iter().map(|s| s.length * s.width).sum();
    let used_area: f64 = sheets
        .iter()
        .flat_map(|s| &s.parts)
        .map(|p| p.square)
        .sum();

    if total_area > 0.0 {
        (used_area / total_area) * 100.0
    } else {
        0.0
    }
}

/// Aggregates waste totals and assembles the final report.
pub(super) fn create_optimization_result(
    sheets: Vec<SheetResult>,
    unplaced_parts: Vec<UnplacedPartInfo>,
) -> OptimizationResult {
    let total_waste = sheets.iter().map(|s| s.waste.square).sum();
    let total_material_area = sheets.iter().map(|s| s.length * s.width).sum();
    let utilization_rate = calculate_utilization_rate(&sheets);

    let mut waste: Vec<WasteEntry> = Vec::new();
    for sheet in &sheets {
        match waste
            .iter_mut()
            .find(|w| w.color == sheet.color && w.thickness == sheet.thickness)
        {
            Some(entry) => entry.square += sheet.waste.square,
            None => waste.push(WasteEntry {
                color: sheet.color.clone(),
                thickness: sheet.thickness,
                square: sheet.waste.square,
            }),
        }
    }

    let mut materials_required: BTreeMap<String, u32> = BTreeMap::new();
    for sheet in &sheets {
        let count = materials_required.entry(sheet.material_id.clone()).or_insert(0);
        *count = (*count).max(sheet.sheet_number);
    }

    let is_complete = unplaced_parts.is_empty();

    OptimizationResult {
        sheets,
        total_waste,
        waste,
        utilization_rate,
        total_material_area,
        materials_required,
        unplaced_parts,
        is_complete,
    }
}
