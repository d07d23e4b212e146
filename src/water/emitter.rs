//! Random periodic swell pushed into one end of the surface.

use bevy::log::debug;
use rand::Rng;

use super::range::WaterRange;
use super::WaterSimulation;

pub struct WaveEmitter {
    period: WaterRange,
    amplitude: WaterRange,
    sample_index: usize,
    enabled: bool,
    timer: f32,
    next_wait: f32,
    next_amplitude: f32,
}

impl WaveEmitter {
    /// Emitter kicking spring 0, with the first wave already drawn.
    pub fn new<R: Rng>(period: WaterRange, amplitude: WaterRange, rng: &mut R) -> Self {
        let mut emitter = Self {
            period,
            amplitude,
            sample_index: 0,
            enabled: true,
            timer: 0.0,
            next_wait: 0.0,
            next_amplitude: 0.0,
        };
        emitter.draw_next(rng);
        emitter
    }

    fn draw_next<R: Rng>(&mut self, rng: &mut R) {
        self.next_wait = self.period.sample(rng);
        self.next_amplitude = self.amplitude.sample(rng);
    }

    /// Advance the timer by `dt`; returns the amplitude if a wave went out.
    pub fn update<R: Rng>(&mut self, water: &mut WaterSimulation, dt: f32, rng: &mut R) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        self.timer += dt;
        if self.timer < self.next_wait {
            return None;
        }

        let amplitude = self.next_amplitude;
        water.disturb_water(self.sample_index, amplitude);
        debug!(
            "wave emitted at spring {} with amplitude {:.2}",
            self.sample_index, amplitude
        );

        self.timer = 0.0;
        self.draw_next(rng);
        Some(amplitude)
    }

    /// Takes effect from the next drawn wave.
    pub fn set_period_range(&mut self, from: f32, to: f32) {
        self.period = WaterRange::lenient(from, to);
    }

    /// Takes effect from the next drawn wave.
    pub fn set_amplitude_range(&mut self, from: f32, to: f32) {
        self.amplitude = WaterRange::lenient(from, to);
    }

    pub fn set_sample_index(&mut self, index: usize) {
        self.sample_index = index;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn period_range(&self) -> WaterRange {
        self.period
    }

    pub fn amplitude_range(&self) -> WaterRange {
        self.amplitude
    }

    pub fn sample_index(&self) -> usize {
        self.sample_index
    }
}
