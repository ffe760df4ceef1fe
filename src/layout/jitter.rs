use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the cosmetic offsets added to radial placements.
pub trait JitterSource {
    /// Returns an offset in `[-amplitude, amplitude)`.
    fn offset(&mut self, amplitude: f32) -> f32;
}

impl<F> JitterSource for F
where
    F: FnMut(f32) -> f32,
{
    fn offset(&mut self, amplitude: f32) -> f32 {
        self(amplitude)
    }
}

pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSource for RandomJitter {
    fn offset(&mut self, amplitude: f32) -> f32 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-amplitude..amplitude)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn offset(&mut self, _amplitude: f32) -> f32 {
        0.0
    }
}
