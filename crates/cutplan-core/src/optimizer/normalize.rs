use super::*;

impl CuttingOptimizer {
    /// Turns requests into unit parts: one per requested copy, with oversized
    /// parts split lengthwise into equal fragments sharing a split group.
    pub fn expand_parts(&self, parts: &[PartRequest]) -> Vec<UnitPart> {
        let max = self.config.max_machine_size;
        let mut expanded = Vec::new();

        for part in parts {
            if !is_splittable(part.length, max) {
                for i in 0..part.quantity {
                    expanded.push(unit_from(part, format!("{}_{}", part.id, i), i, None, part.length));
                }
                continue;
            }

            let segments = (part.length / max).ceil() as u32;
            let segment_length = (part.length / f64::from(segments)).ceil();

            for copy in 0..part.quantity {
                for segment in 0..segments {
                    expanded.push(unit_from(
                        part,
                        format!("{}_{}_{}", part.id, copy, segment),
                        copy,
                        Some(segment),
                        segment_length,
                    ));
                }
            }
        }

        expanded
    }
}

/// Number of unit parts a request expands into.
pub(crate) fn unit_part_count(part: &PartRequest, max: f64) -> f64 {
    let segments = if is_splittable(part.length, max) {
        (part.length / max).ceil()
    } else {
        1.0
    };
    segments * f64::from(part.quantity)
}

fn is_splittable(length: f64, max: f64) -> bool {
    max > 0.0 && length.is_finite() && length > max
}

fn unit_from(part: &PartRequest, id: String, instance: u32, segment: Option<u32>, length: f64) -> UnitPart {
    UnitPart {
        id,
        original_id: part.id.clone(),
        instance,
        segment,
        split_group_id: segment.map(|_| part.id.clone()),
        length,
        width: part.width,
        color: part.color.clone(),
        thickness: part.thickness,
        can_rotate: part.can_rotate,
        label: part.label.clone(),
        description: part.description.clone(),
    }
}
