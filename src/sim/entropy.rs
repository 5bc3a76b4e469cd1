//! Random sources for spawn offsets and collision jitter
//!
//! The simulation never reaches for a global generator. Production sessions
//! own a `Pcg32` seeded from the OS; tests substitute a fixed seed or a
//! `FixedEntropy` script.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform source of samples in `[0, 1)`
pub trait Entropy {
    fn next_unit(&mut self) -> f32;

    /// Uniform sample in `[-range / 2, range / 2)`
    fn centered(&mut self, range: f32) -> f32 {
        (self.next_unit() - 0.5) * range
    }
}

impl Entropy for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

impl<E: Entropy + ?Sized> Entropy for &mut E {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Generator seeded from the thread RNG (non-reproducible)
pub fn os_seeded() -> Pcg32 {
    Pcg32::from_rng(&mut rand::rng())
}

/// Reproducible generator for a given seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedEntropy {
    /// Samples outside `[0, 1)` are clamped into range. An empty list replays 0.5.
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        let values: Vec<f32> = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Always 0.5: spawns dead centre and bounces straight along the contact normal
    pub fn neutral() -> Self {
        Self::new([0.5])
    }
}

impl Entropy for FixedEntropy {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v
    }
}
