use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Source of randomness for message selection.
pub trait MessagePicker {
    /// Uniform index in `0..len`. Only called with `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Picker backed by any rand generator.
#[derive(Debug, Clone)]
pub struct RngPicker<R> {
    rng: R,
}

impl<R: RngCore> RngPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngPicker<Mcg128Xsl64> {
    /// Reproducible picker for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Mcg128Xsl64::seed_from_u64(seed))
    }

    /// Picker seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(Mcg128Xsl64::from_entropy())
    }
}

impl<R: RngCore> MessagePicker for RngPicker<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}
