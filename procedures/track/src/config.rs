use crate::curve::CurveFamily;
use crate::error::TrackError;
use crate::noise::NoiseConfig;
use crate::points::SeedPolicy;
use crate::ribbon::RibbonBuilder;
use serde::{Deserialize, Serialize};

/// Everything needed to produce a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
	/// Number of random points, which is also the number of waypoints
	pub point_count: usize,
	/// Curve joining the waypoints
	pub family: CurveFamily,
	/// Seed source for the point cloud
	pub seed: SeedPolicy,
	/// Half size of the square the point cloud is drawn from
	pub extent: f32,
	/// Rail width, sampling step and height scale
	#[serde(flatten)]
	pub ribbon: RibbonBuilder,
	/// Height field settings
	pub noise: NoiseConfig,
	/// Draw a new height field whenever the point cloud is regenerated
	pub reseed_noise: bool,
}

impl Default for TrackConfig {
	fn default() -> Self {
		Self {
			point_count: 13,
			family: CurveFamily::default(),
			seed: SeedPolicy::default(),
			extent: 1.0,
			ribbon: RibbonBuilder::default(),
			noise: NoiseConfig::default(),
			reseed_noise: false,
		}
	}
}

impl TrackConfig {
	pub fn new(seed: SeedPolicy) -> Self {
		Self { seed, ..Default::default() }
	}

	pub fn with_point_count(mut self, point_count: usize) -> Self {
		self.point_count = point_count;
		self
	}

	pub fn with_family(mut self, family: CurveFamily) -> Self {
		self.family = family;
		self
	}

	pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
		self.seed = seed;
		self
	}

	pub fn with_extent(mut self, extent: f32) -> Self {
		self.extent = extent;
		self
	}

	pub fn with_track_width(mut self, track_width: f32) -> Self {
		self.ribbon.track_width = track_width;
		self
	}

	pub fn with_detail_step(mut self, detail_step: f32) -> Self {
		self.ribbon.detail_step = detail_step;
		self
	}

	pub fn with_height_scale(mut self, height_scale: f32) -> Self {
		self.ribbon.height_scale = height_scale;
		self
	}

	pub fn with_noise(mut self, noise: NoiseConfig) -> Self {
		self.noise = noise;
		self
	}

	pub fn with_reseed_noise(mut self, reseed_noise: bool) -> Self {
		self.reseed_noise = reseed_noise;
		self
	}

	/// Checks everything that can be checked before generating anything.
	pub fn validate(&self) -> Result<(), TrackError> {
		if self.point_count < self.family.min_waypoints() {
			return Err(TrackError::invalid_argument(format!(
				"{} needs at least {} points, got {}",
				self.family,
				self.family.min_waypoints(),
				self.point_count
			)));
		}
		self.ribbon.validate()
	}
}
