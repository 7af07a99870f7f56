use super::*;
use crate::packer::{FitHeuristic, MaxRectsPacker, PackRect};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

/// Section length and the parts that qualify for it, longest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionPlan {
    pub length: f64,
    pub parts: Vec<UnitPart>,
}

/// Sizes the next section to the longest extent any fitting part needs along
/// the material, or returns `None` when no pending part qualifies.
///
/// `material_width` is expected to be capped by the machine envelope already.
pub fn plan_section(pending: &[UnitPart], material_width: f64, usable_length: f64) -> Option<SectionPlan> {
    let mut sized: Vec<(f64, UnitPart)> = pending
        .iter()
        .filter_map(|part| {
            section_extent(part, material_width, usable_length).map(|extent| (extent, part.clone()))
        })
        .collect();
    sized.sort_by(|(_, a), (_, b)| {
        b.longer_side()
            .partial_cmp(&a.longer_side())
            .unwrap_or(Ordering::Equal)
    });

    let longest = sized.iter().map(|(extent, _)| *extent).reduce(f64::max)?;
    let length = longest.min(usable_length);
    if length.is_nan() || length <= 0.0 {
        return None;
    }

    let parts = sized.into_iter().map(|(_, part)| part).collect();
    Some(SectionPlan { length, parts })
}

/// Length a part occupies along the material: its longer side when that fits,
/// otherwise its shorter side if the part may be turned across the sheet.
fn section_extent(part: &UnitPart, material_width: f64, usable_length: f64) -> Option<f64> {
    let (long, short) = (part.longer_side(), part.shorter_side());

    if short <= material_width && long <= usable_length {
        Some(long)
    } else if part.can_rotate && long <= material_width && short <= usable_length {
        Some(short)
    } else {
        None
    }
}

/// Cut-line position on one material: which physical copy, how far along it.
#[derive(Debug)]
struct SheetCursor {
    sheet_number: u32,
    cut_line: f64,
    sections: u32,
}

impl SheetCursor {
    fn new() -> Self {
        Self {
            sheet_number: 1,
            cut_line: 0.0,
            sections: 0,
        }
    }

    fn carve(&self, material: &MaterialSheet, length: f64) -> MaterialSection {
        MaterialSection {
            id: format!("{}_{}", material.id, self.sections),
            material_id: material.id.clone(),
            sheet_number: self.sheet_number,
            offset: self.cut_line,
            length,
            width: material.width,
            color: material.color.clone(),
            thickness: material.thickness,
        }
    }

    fn advance(&mut self, length: f64) {
        self.cut_line += length;
        self.sections += 1;
    }

    /// Moves to a fresh copy of the material; fails when the current copy is
    /// still untouched or no copies are left.
    fn next_sheet(&mut self, material: &MaterialSheet) -> bool {
        if self.cut_line > 0.0 && self.sheet_number < material.available_quantity {
            self.sheet_number += 1;
            self.cut_line = 0.0;
            true
        } else {
            false
        }
    }
}

impl CuttingOptimizer {
    /// Consumes materials section by section until they or the parts run out.
    /// Returns the parts that were never placed.
    pub(super) fn optimize_parts(
        &mut self,
        parts: Vec<UnitPart>,
        materials: &[MaterialSheet],
        options: &OptimizationOptions,
        sheets: &mut Vec<SheetResult>,
    ) -> Result<Vec<UnitPart>> {
        let mut remaining = parts;

        for material in materials {
            if remaining.is_empty() {
                break;
            }
            if material.available_quantity == 0 {
                debug!("Skipping material {} with no sheets in stock", material.id);
                continue;
            }

            let mut cursor = SheetCursor::new();
            while !remaining.is_empty() {
                let usable_length =
                    (material.length - cursor.cut_line).min(self.config.max_machine_size);
                let usable_width = material.width.min(self.config.max_machine_size);

                let sheet = match plan_section(&remaining, usable_width, usable_length) {
                    Some(plan) => {
                        let section = cursor.carve(material, plan.length);
                        let sheet = self.pack_section(&section, plan.parts, options)?;
                        Some(sheet).filter(|s| !s.parts.is_empty())
                    }
                    None => None,
                };

                match sheet {
                    Some(sheet) => {
                        debug!(
                            "Section {} placed {} parts ({:.2}% used)",
                            sheet.id,
                            sheet.parts.len(),
                            sheet.waste.utilization_rate
                        );
                        remaining = filter_remaining(remaining, &sheet.parts);
                        cursor.advance(sheet.length);
                        sheets.push(sheet);
                    }
                    None => {
                        if !cursor.next_sheet(material) {
                            break;
                        }
                    }
                }
            }
        }

        Ok(remaining)
    }

    /// Runs the packing engine on one section.
    pub(super) fn pack_section(
        &mut self,
        section: &MaterialSection,
        parts: Vec<UnitPart>,
        options: &OptimizationOptions,
    ) -> Result<SheetResult> {
        let packer_options = self.packer_options(section, options.smart_pack);
        let mut packer = MaxRectsPacker::new(
            packer_options.width,
            packer_options.height,
            packer_options.padding,
            packer_options.heuristic,
        );

        let rects = parts.into_iter().map(|part| PackRect {
            width: part.length,
            height: part.width,
            allow_rotation: part.can_rotate,
            data: part,
        });
        let outcome = packer.pack(rects)?;

        let placed = outcome
            .placed
            .into_iter()
            .filter(|rect| {
                let valid = rect.placement.x >= 0.0 && rect.placement.y >= 0.0;
                if !valid {
                    warn!(
                        "Discarding placement of {} at negative position ({}, {})",
                        rect.data.id, rect.placement.x, rect.placement.y
                    );
                }
                valid
            })
            .map(|rect| {
                let p = rect.placement;
                let part = rect.data;
                PlacedPart {
                    id: part.id,
                    length: p.width,
                    width: p.height,
                    x: p.x,
                    y: p.y,
                    square: p.width * p.height,
                    rotated: p.rotated,
                    color: section.color.clone(),
                    thickness: section.thickness,
                    label: part.label,
                    description: part.description,
                    original_id: part.original_id,
                    split_group_id: part.split_group_id,
                }
            })
            .collect();

        Ok(self.create_sheet_result(section, placed))
    }

    /// Bin size for a section, capped by the machine envelope on both sides.
    pub(super) fn packer_options(&mut self, section: &MaterialSection, smart_pack: bool) -> PackerOptions {
        let max = self.config.max_machine_size;
        let padding = self.config.padding;

        self.cache.get_or_insert_with(
            &section.id,
            section.length,
            section.width,
            smart_pack,
            || PackerOptions {
                width: section.length.min(max),
                height: section.width.min(max),
                padding,
                heuristic: FitHeuristic::from_smart_pack(smart_pack),
            },
        )
    }
}

/// Drops one pending part per placed id.
fn filter_remaining(parts: Vec<UnitPart>, placed: &[PlacedPart]) -> Vec<UnitPart> {
    let mut placed_ids: HashMap<&str, usize> = HashMap::new();
    for part in placed {
        *placed_ids.entry(part.id.as_str()).or_insert(0) += 1;
    }

    parts
        .into_iter()
        .filter(|part| match placed_ids.get_mut(part.id.as_str()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .collect()
}
