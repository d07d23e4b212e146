//! Spring array and lateral wave propagation.

use super::error::WaterConfigError;
use super::range::WaterRange;
use super::spring::Spring;
use crate::resources::WaterParams;

/// Fixed, position-ordered row of springs spanning the simulation range.
pub struct WaveField {
    springs: Vec<Spring>,
    range: WaterRange,
    spacing: f32,
    // Per-pass scratch: inflow from the left / right neighbour.
    from_left: Vec<f32>,
    from_right: Vec<f32>,
}

impl WaveField {
    /// Evenly place `count` springs from `range.from` to `range.to` inclusive.
    ///
    /// A zero-width range is rejected: every spring would share one x.
    pub fn new(range: WaterRange, count: usize, level: f32) -> Result<Self, WaterConfigError> {
        if count < 2 {
            return Err(WaterConfigError::TooFewSprings(count));
        }
        if range.extent() <= 0.0 {
            return Err(WaterConfigError::InvalidRange {
                from: range.from,
                to: range.to,
            });
        }
        let spacing = range.extent() / (count - 1) as f32;
        let springs = (0..count)
            .map(|i| Spring::new(range.from + i as f32 * spacing, level))
            .collect();
        Ok(Self {
            springs,
            range,
            spacing,
            from_left: vec![0.0; count],
            from_right: vec![0.0; count],
        })
    }

    /// Settle every spring, then spread height differences to neighbours.
    ///
    /// Each pass computes every spring's inflow from a single height snapshot
    /// before applying any of it, so propagation is direction-symmetric.
    pub fn step(&mut self, params: &WaterParams) {
        for spring in &mut self.springs {
            spring.update(
                params.springs_stiffness,
                params.springs_dampening_factor,
                params.base_water_level,
            );
        }

        let spread = params.waves_propagation_spread_factor;
        let last = self.springs.len() - 1;
        for _ in 0..params.waves_propagation_passes {
            for i in 0..=last {
                let height = self.springs[i].height();
                self.from_left[i] = if i > 0 {
                    spread * (self.springs[i - 1].height() - height)
                } else {
                    0.0
                };
                self.from_right[i] = if i < last {
                    spread * (self.springs[i + 1].height() - height)
                } else {
                    0.0
                };
            }
            for (i, spring) in self.springs.iter_mut().enumerate() {
                let delta = self.from_left[i] + self.from_right[i];
                spring.add_velocity(delta);
                spring.add_height(delta);
            }
        }
    }

    /// Kick one spring. Out-of-range indices are ignored.
    pub fn disturb(&mut self, index: usize, velocity: f32) -> bool {
        match self.springs.get_mut(index) {
            Some(spring) => {
                spring.add_velocity(velocity);
                true
            }
            None => false,
        }
    }

    /// Spring index for a world x inside the range, rounded to nearest.
    ///
    /// The scale is `len / extent`, so the right end of the range maps to
    /// `len` and is rejected by [`WaveField::disturb`].
    pub fn index_at(&self, world_x: f32) -> Option<usize> {
        if !self.range.contains(world_x) {
            return None;
        }
        let index = self.springs.len() as f32 * self.range.percentage(world_x);
        Some(index.round() as usize)
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.springs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }
}
