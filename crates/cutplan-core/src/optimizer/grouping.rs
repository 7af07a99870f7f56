use super::*;
use std::collections::HashMap;

/// Material class shared by every part of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialKey {
    pub color: String,
    pub thickness: f64,
}

impl MaterialKey {
    pub fn matches(&self, color: &str, thickness: f64) -> bool {
        self.color == color && self.thickness == thickness
    }

    fn hash_key(&self) -> (String, u64) {
        // adding 0.0 folds -0.0 into 0.0
        (self.color.clone(), (self.thickness + 0.0).to_bits())
    }
}

/// Unit parts that may share a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PartGroup {
    pub key: MaterialKey,
    pub parts: Vec<UnitPart>,
}

/// Partitions unit parts by (color, thickness), keeping first-appearance
/// order of groups and input order within each group.
pub fn group_parts(parts: Vec<UnitPart>) -> Vec<PartGroup> {
    let mut groups: Vec<PartGroup> = Vec::new();
    let mut index: HashMap<(String, u64), usize> = HashMap::new();

    for part in parts {
        let key = MaterialKey {
            color: part.color.clone(),
            thickness: part.thickness,
        };
        let slot = *index.entry(key.hash_key()).or_insert_with(|| {
            groups.push(PartGroup {
                key,
                parts: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].parts.push(part);
    }

    groups
}
