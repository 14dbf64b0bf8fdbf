pub mod config;

pub use config::NoiseConfig;

use ::noise::{NoiseFn, Perlin, Seedable};

/// Perlin height field sampled in the track plane.
///
/// A field is a pure function of `(x, y)` for its seed, heights stay roughly within
/// [-1, 1]. Fields are never reseeded in place, [`NoiseField::reseeded`] hands back a new one.
#[derive(Debug, Clone)]
pub struct NoiseField {
	config: NoiseConfig,
	perlin: Perlin,
}

impl NoiseField {
	pub fn new(config: NoiseConfig) -> Self {
		Self { perlin: Perlin::new(config.seed), config }
	}

	pub fn from_seed(seed: u32) -> Self {
		Self::new(NoiseConfig::default().with_seed(seed))
	}

	pub fn config(&self) -> &NoiseConfig {
		&self.config
	}

	pub fn seed(&self) -> u32 {
		self.perlin.seed()
	}

	/// A new, uncorrelated field with the same frequency and octaves.
	pub fn reseeded(&self, seed: u32) -> Self {
		Self::new(self.config.with_seed(seed))
	}

	pub fn height(&self, x: f32, y: f32) -> f32 {
		let mut height = 0.0;
		let mut amplitude = 1.0;
		let mut frequency = self.config.frequency as f64;
		let mut max_value = 0.0;

		for _ in 0..self.config.octaves.max(1) {
			let sample = self.perlin.get([x as f64 * frequency, y as f64 * frequency]) as f32;
			height += sample * amplitude;
			max_value += amplitude;
			amplitude *= 0.5;
			frequency *= 2.0;
		}

		height / max_value
	}
}

impl Default for NoiseField {
	fn default() -> Self {
		Self::new(NoiseConfig::default())
	}
}

impl PartialEq for NoiseField {
	fn eq(&self, other: &Self) -> bool {
		self.config == other.config
	}
}
