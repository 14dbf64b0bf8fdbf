use crate::error::TrackError;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// How the point generator picks its random seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
	/// Every generation uses the same seed, so tracks are reproducible.
	Fixed(u64),
	/// Every generation reseeds from the current time.
	WallClock,
}

impl Default for SeedPolicy {
	fn default() -> Self {
		SeedPolicy::Fixed(0)
	}
}

impl SeedPolicy {
	pub fn seed(&self) -> u64 {
		match self {
			SeedPolicy::Fixed(seed) => *seed,
			SeedPolicy::WallClock => chrono::Utc::now().timestamp_micros() as u64,
		}
	}
}

/// Ordered, circular sequence of waypoints in the track plane.
///
/// Index `len` conceptually wraps back to `0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaypointLoop {
	points: Vec<Vec3>,
}

impl WaypointLoop {
	pub fn new(points: Vec<Vec3>) -> Self {
		Self { points }
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn points(&self) -> &[Vec3] {
		&self.points
	}

	pub fn into_points(self) -> Vec<Vec3> {
		self.points
	}

	pub fn first(&self) -> Option<Vec3> {
		self.points.first().copied()
	}

	pub fn last(&self) -> Option<Vec3> {
		self.points.last().copied()
	}
}

impl Index<usize> for WaypointLoop {
	type Output = Vec3;

	fn index(&self, index: usize) -> &Self::Output {
		&self.points[index]
	}
}

impl From<Vec<Vec3>> for WaypointLoop {
	fn from(points: Vec<Vec3>) -> Self {
		Self::new(points)
	}
}

/// Builds closed waypoint loops from random point clouds.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGenerator {
	/// Seed source, consulted once per call to [`PointGenerator::generate`]
	pub seed: SeedPolicy,
	/// Points are drawn from `[-extent, extent]` on both axes
	pub extent: f32,
}

impl Default for PointGenerator {
	fn default() -> Self {
		Self { seed: SeedPolicy::default(), extent: 1.0 }
	}
}

impl PointGenerator {
	pub fn new(seed: SeedPolicy) -> Self {
		Self { seed, ..Default::default() }
	}

	pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
		self.seed = seed;
		self
	}

	pub fn with_extent(mut self, extent: f32) -> Self {
		self.extent = extent;
		self
	}

	/// Samples `count` points, orders them into a greedy tour and smooths the result.
	///
	/// Needs `count >= 1`. Whether the loop is long enough for a particular curve family is
	/// for the caller to check.
	pub fn generate(&self, count: usize) -> Result<WaypointLoop, TrackError> {
		self.generate_with_seed(count, self.seed.seed())
	}

	/// Same as [`PointGenerator::generate`] but with the seed supplied by the caller.
	pub fn generate_with_seed(&self, count: usize, seed: u64) -> Result<WaypointLoop, TrackError> {
		if count < 1 {
			return Err(TrackError::invalid_argument("point count must be at least 1"));
		}
		if !(self.extent.is_finite() && self.extent > 0.0) {
			return Err(TrackError::invalid_argument(format!(
				"point extent must be positive, got {}",
				self.extent
			)));
		}

		let mut rng = Pcg64Mcg::seed_from_u64(seed);
		let cloud = sample_points(&mut rng, count, self.extent);
		let tour = nearest_neighbour_tour(cloud);
		let waypoints = smooth_loop(&tour);

		log::debug!("Generated {} waypoints from seed {}", waypoints.len(), seed);
		Ok(WaypointLoop::new(waypoints))
	}
}

/// Shorthand for a generator using a fixed seed when one is given and the clock otherwise.
pub fn generate(count: usize, seed: Option<u64>) -> Result<WaypointLoop, TrackError> {
	let policy = seed.map(SeedPolicy::Fixed).unwrap_or(SeedPolicy::WallClock);
	PointGenerator::new(policy).generate(count)
}

/// Uniform points in the `[-extent, extent]` square, z = 0.
pub fn sample_points<R: Rng>(rng: &mut R, count: usize, extent: f32) -> Vec<Vec3> {
	(0..count)
		.map(|_| {
			Vec3::new(rng.random_range(-extent..=extent), rng.random_range(-extent..=extent), 0.0)
		})
		.collect()
}

/// Orders points by repeatedly hopping to the closest unvisited one.
///
/// The tour starts from the last point of the input. Ties go to the earliest remaining point.
pub fn nearest_neighbour_tour(mut remaining: Vec<Vec3>) -> Vec<Vec3> {
	let mut tour = Vec::with_capacity(remaining.len());
	let Some(start) = remaining.pop() else {
		return tour;
	};
	tour.push(start);

	while !remaining.is_empty() {
		let current = tour[tour.len() - 1];
		let mut closest = 0;
		let mut closest_distance = f32::INFINITY;
		for (index, point) in remaining.iter().enumerate() {
			let distance = current.distance(*point);
			if distance < closest_distance {
				closest_distance = distance;
				closest = index;
			}
		}
		// keep the remaining order stable so ties stay deterministic
		tour.push(remaining.remove(closest));
	}

	tour
}

/// Replaces each point with the mean of itself and the next two, wrapping around the end.
pub fn smooth_loop(path: &[Vec3]) -> Vec<Vec3> {
	let len = path.len();
	(0..len).map(|i| (path[i] + path[(i + 1) % len] + path[(i + 2) % len]) / 3.0).collect()
}
