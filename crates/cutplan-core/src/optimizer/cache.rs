use crate::packer::FitHeuristic;
use std::collections::{HashMap, VecDeque};

/// Bin parameters derived from a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackerOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub heuristic: FitHeuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    sheet_id: String,
    length_bits: u64,
    width_bits: u64,
    smart_pack: bool,
}

/// Bounded memo of packer options, evicting the oldest entry when full.
///
/// Entries are pure functions of their key, so dropping the cache (capacity 0)
/// never changes a packing result.
#[derive(Debug, Clone, Default)]
pub struct PackerOptionsCache {
    capacity: usize,
    entries: HashMap<CacheKey, PackerOptions>,
    order: VecDeque<CacheKey>,
}

impl PackerOptionsCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_or_insert_with(
        &mut self,
        sheet_id: &str,
        length: f64,
        width: f64,
        smart_pack: bool,
        compute: impl FnOnce() -> PackerOptions,
    ) -> PackerOptions {
        if self.capacity == 0 {
            return compute();
        }

        let key = CacheKey {
            sheet_id: sheet_id.to_string(),
            length_bits: length.to_bits(),
            width_bits: width.to_bits(),
            smart_pack,
        };

        if let Some(options) = self.entries.get(&key) {
            return *options;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        let options = compute();
        self.order.push_back(key.clone());
        self.entries.insert(key, options);
        options
    }
}
