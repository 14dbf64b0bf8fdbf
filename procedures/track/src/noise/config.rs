use serde::{Deserialize, Serialize};

/// Settings for the track height field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
	/// Perlin permutation seed
	pub seed: u32,
	/// Lattice cells per unit of track space on the first octave
	pub frequency: f32,
	/// Number of summed octaves, each at double frequency and half amplitude
	pub octaves: u32,
}

impl Default for NoiseConfig {
	fn default() -> Self {
		Self { seed: 0, frequency: 1.5, octaves: 3 }
	}
}

impl NoiseConfig {
	pub fn with_seed(mut self, seed: u32) -> Self {
		self.seed = seed;
		self
	}

	pub fn with_frequency(mut self, frequency: f32) -> Self {
		self.frequency = frequency;
		self
	}

	pub fn with_octaves(mut self, octaves: u32) -> Self {
		self.octaves = octaves;
		self
	}
}
