//! Closed intervals on the horizontal axis (and on scalar tunables).

use rand::Rng;

use super::error::WaterConfigError;

/// Closed interval `[from, to]` with `from <= to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterRange {
    pub from: f32,
    pub to: f32,
}

impl WaterRange {
    /// Strict constructor: fails when `to < from` or a bound is not finite.
    pub fn new(from: f32, to: f32) -> Result<Self, WaterConfigError> {
        if !from.is_finite() || !to.is_finite() || to < from {
            return Err(WaterConfigError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Never fails; an inverted range collapses onto `to`.
    ///
    /// Used by runtime setters where a half-dragged slider should not error.
    pub fn lenient(from: f32, to: f32) -> Self {
        if to < from {
            Self { from: to, to }
        } else {
            Self { from, to }
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.from && x <= self.to
    }

    pub fn contains_range(&self, other: &WaterRange) -> bool {
        self.contains(other.from) && self.contains(other.to)
    }

    pub fn extent(&self) -> f32 {
        self.to - self.from
    }

    pub fn half_extent(&self) -> f32 {
        self.extent() / 2.0
    }

    pub fn center(&self) -> f32 {
        self.from + self.half_extent()
    }

    /// Position of `x` relative to the range: 0 at `from`, 1 at `to`.
    pub fn percentage(&self, x: f32) -> f32 {
        (x - self.from) / self.extent()
    }

    pub fn clamped_percentage(&self, x: f32) -> f32 {
        self.percentage(x).clamp(0.0, 1.0)
    }

    /// `[from + offset, from + offset + extent]`, which must fit inside `self`.
    pub fn sub_range(&self, offset: f32, extent: f32) -> Result<Self, WaterConfigError> {
        if offset < 0.0 || extent < 0.0 || offset + extent > self.extent() {
            return Err(WaterConfigError::InvalidSubRange { offset, extent });
        }
        let from = self.from + offset;
        Ok(Self {
            from,
            to: from + extent,
        })
    }

    /// Uniform sample; a zero-width range always yields `from`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.extent() <= 0.0 {
            self.from
        } else {
            rng.gen_range(self.from..=self.to)
        }
    }
}
