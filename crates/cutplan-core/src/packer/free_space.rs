use crate::error::{CuttingError, Result};

/// Axis-aligned rectangle of the bin that is still free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FreeRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn intersects(&self, other: &FreeRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contained_in(&self, other: &FreeRect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }
}

/// Splits every free rectangle overlapping `used` into its maximal remainders.
///
/// A free rectangle that overlaps the used node yields up to four pieces: the
/// full-height strips left and right of the node and the full-width strips
/// above and below it. Pieces overlap each other; `prune` removes the ones
/// that end up fully covered by a sibling.
pub(super) fn split_free_rects(free: Vec<FreeRect>, used: &FreeRect) -> Vec<FreeRect> {
    let mut next = Vec::with_capacity(free.len() + 4);

    for area in free {
        if !area.intersects(used) {
            next.push(area);
            continue;
        }

        if used.x > area.x {
            next.push(FreeRect {
                x: area.x,
                y: area.y,
                width: used.x - area.x,
                height: area.height,
            });
        }

        if used.right() < area.right() {
            next.push(FreeRect {
                x: used.right(),
                y: area.y,
                width: area.right() - used.right(),
                height: area.height,
            });
        }

        if used.y > area.y {
            next.push(FreeRect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: used.y - area.y,
            });
        }

        if used.bottom() < area.bottom() {
            next.push(FreeRect {
                x: area.x,
                y: used.bottom(),
                width: area.width,
                height: area.bottom() - used.bottom(),
            });
        }
    }

    next
}

/// Drops free rectangles fully contained in another one.
pub(super) fn prune(free: &mut Vec<FreeRect>) {
    let n = free.len();
    let mut keep = vec![true; n];

    for i in 0..n {
        for j in 0..n {
            if i == j || !keep[j] {
                continue;
            }
            if free[i].contained_in(&free[j]) {
                keep[i] = false;
                break;
            }
        }
    }

    let mut flags = keep.into_iter();
    free.retain(|_| flags.next().unwrap_or(false));
}

/// Rejects free-space state that can only come from an engine defect.
pub(super) fn check_free_rects(free: &[FreeRect]) -> Result<()> {
    for rect in free {
        let valid = [rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|v| v.is_finite())
            && rect.x >= 0.0
            && rect.y >= 0.0
            && rect.width > 0.0
            && rect.height > 0.0;

        if !valid {
            return Err(CuttingError::PackingEngine(format!(
                "malformed free rectangle at ({}, {}) sized {} x {}",
                rect.x, rect.y, rect.width, rect.height
            )));
        }
    }
    Ok(())
}
