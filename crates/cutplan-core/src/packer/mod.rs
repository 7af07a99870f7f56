//! Maximal-free-rectangles packing of rectangles into a single bin.

use crate::error::{CuttingError, Result};

mod free_space;

pub use free_space::FreeRect;
use free_space::{check_free_rects, prune, split_free_rects};

/// Tolerance for bounds checks on placed rectangles.
const EPS: f64 = 1e-6;

/// How a free rectangle is chosen for the next piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitHeuristic {
    /// Smallest leftover area, ties broken by the shortest leftover side
    BestAreaFit,
    /// First free rectangle that fits, original orientation first
    FirstFit,
}

impl FitHeuristic {
    pub fn from_smart_pack(smart_pack: bool) -> Self {
        if smart_pack {
            FitHeuristic::BestAreaFit
        } else {
            FitHeuristic::FirstFit
        }
    }
}

/// Rectangle to be packed, carrying an opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PackRect<T> {
    pub width: f64,
    pub height: f64,
    pub allow_rotation: bool,
    pub data: T,
}

/// Position chosen for a rectangle; `width`/`height` are post-rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// Rectangle placed in the bin together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRect<T> {
    pub placement: Placement,
    pub data: T,
}

#[derive(Debug)]
pub struct PackOutcome<T> {
    /// Placed rectangles, in placement order
    pub placed: Vec<PackedRect<T>>,
    pub unplaced: Vec<PackRect<T>>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    node: FreeRect,
    rotated: bool,
    area_fit: f64,
    short_side_fit: f64,
}

impl Candidate {
    fn better_than(&self, other: &Candidate) -> bool {
        self.area_fit < other.area_fit
            || (self.area_fit == other.area_fit && self.short_side_fit < other.short_side_fit)
    }
}

/// Single-bin packer tracking the maximal free rectangles of the bin.
///
/// Padding is reserved to the right of and below every placed rectangle; the
/// free space starts padded by the same amount so that rectangles may still
/// touch the far edges of the bin.
#[derive(Debug, Clone)]
pub struct MaxRectsPacker {
    width: f64,
    height: f64,
    padding: f64,
    heuristic: FitHeuristic,
    free: Vec<FreeRect>,
}

impl MaxRectsPacker {
    pub fn new(width: f64, height: f64, padding: f64, heuristic: FitHeuristic) -> Self {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        let usable = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;

        let free = if usable {
            vec![FreeRect {
                x: 0.0,
                y: 0.0,
                width: width + padding,
                height: height + padding,
            }]
        } else {
            Vec::new()
        };

        Self {
            width,
            height,
            padding,
            heuristic,
            free,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn free_rects(&self) -> &[FreeRect] {
        &self.free
    }

    /// Packs rectangles in the given order; pieces that fit nowhere are returned as unplaced.
    pub fn pack<T>(&mut self, rects: impl IntoIterator<Item = PackRect<T>>) -> Result<PackOutcome<T>> {
        let mut placed = Vec::new();
        let mut unplaced = Vec::new();

        for rect in rects {
            match self.insert(rect.width, rect.height, rect.allow_rotation)? {
                Some(placement) => placed.push(PackedRect {
                    placement,
                    data: rect.data,
                }),
                None => unplaced.push(rect),
            }
        }

        Ok(PackOutcome { placed, unplaced })
    }

    /// Places one rectangle, returning `None` when no free rectangle can hold it.
    pub fn insert(&mut self, width: f64, height: f64, allow_rotation: bool) -> Result<Option<Placement>> {
        let sane = width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0;
        if !sane {
            return Ok(None);
        }

        let Some(candidate) = self.find_position(width, height, allow_rotation) else {
            return Ok(None);
        };

        let (placed_width, placed_height) = if candidate.rotated {
            (height, width)
        } else {
            (width, height)
        };
        let placement = Placement {
            x: candidate.node.x,
            y: candidate.node.y,
            width: placed_width,
            height: placed_height,
            rotated: candidate.rotated,
        };

        if placement.x < 0.0
            || placement.y < 0.0
            || placement.x + placement.width > self.width + EPS
            || placement.y + placement.height > self.height + EPS
        {
            return Err(CuttingError::PackingEngine(format!(
                "placement at ({}, {}) sized {} x {} leaves the {} x {} bin",
                placement.x, placement.y, placement.width, placement.height, self.width, self.height
            )));
        }

        self.occupy(&candidate.node)?;
        Ok(Some(placement))
    }

    fn find_position(&self, width: f64, height: f64, allow_rotation: bool) -> Option<Candidate> {
        let mut orientations = vec![(width, height, false)];
        if allow_rotation && width != height {
            orientations.push((height, width, true));
        }

        let mut best: Option<Candidate> = None;

        for area in &self.free {
            for &(w, h, rotated) in &orientations {
                let reserved_w = w + self.padding;
                let reserved_h = h + self.padding;
                if reserved_w > area.width || reserved_h > area.height {
                    continue;
                }

                let candidate = Candidate {
                    node: FreeRect {
                        x: area.x,
                        y: area.y,
                        width: reserved_w,
                        height: reserved_h,
                    },
                    rotated,
                    area_fit: area.area() - reserved_w * reserved_h,
                    short_side_fit: (area.width - reserved_w).min(area.height - reserved_h),
                };

                match self.heuristic {
                    FitHeuristic::FirstFit => return Some(candidate),
                    FitHeuristic::BestAreaFit => {
                        if best.map_or(true, |current| candidate.better_than(&current)) {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }

        best
    }

    fn occupy(&mut self, node: &FreeRect) -> Result<()> {
        let free = std::mem::take(&mut self.free);
        let mut next = split_free_rects(free, node);
        prune(&mut next);
        check_free_rects(&next)?;
        self.free = next;
        Ok(())
    }
}
