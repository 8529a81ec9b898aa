//! Movement tolerance for pointer events.
//!
//! A pointer event that lands further than `tolerance` pixels from the last
//! accepted position is treated as the end of a drag or text selection, not a
//! click, and is dropped without moving the baseline.

use crate::event::Point;

#[derive(Debug, Clone, Default)]
pub struct ToleranceFilter {
    tolerance: f64,
    last: Option<Point>,
}

impl ToleranceFilter {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            last: None,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Change the threshold. The baseline is kept.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    /// Zero (or negative) tolerance disables the filter.
    pub fn is_enabled(&self) -> bool {
        self.tolerance > 0.0
    }

    /// Last accepted position.
    pub fn baseline(&self) -> Option<Point> {
        self.last
    }

    /// Returns whether the event at `position` may proceed.
    pub fn admit(&mut self, position: Point) -> bool {
        if !self.is_enabled() {
            return true;
        }

        if let Some(last) = self.last {
            if last.distance_to(&position) > self.tolerance {
                return false;
            }
        }

        self.last = Some(position);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
