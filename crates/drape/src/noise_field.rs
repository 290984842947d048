use noise::{NoiseFn, OpenSimplex};

/// Coherent 3D noise over `(row, col, time)` lattice coordinates.
#[derive(Debug, Clone)]
pub struct NoiseField {
    noise: OpenSimplex,
    seed: u32,
    frequency: f32,
}

impl NoiseField {
    pub fn new(seed: u32, frequency: f32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            seed,
            frequency,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Value in `[-1, 1]`, continuous in every argument.
    pub fn sample(&self, row: usize, col: usize, time: f32) -> f32 {
        let x = row as f64 * self.frequency as f64;
        let y = col as f64 * self.frequency as f64;
        (self.noise.get([x, y, time as f64]) as f32).clamp(-1.0, 1.0)
    }
}
