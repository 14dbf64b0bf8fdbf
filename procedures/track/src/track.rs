use crate::config::TrackConfig;
use crate::curve::{ClosedLoop, CurveFamily};
use crate::error::TrackError;
use crate::noise::NoiseField;
use crate::points::{PointGenerator, WaypointLoop};
use crate::ribbon::{RibbonBuilder, RibbonMesh};
use crate::transition::FamilyTransition;
use bevy::prelude::*;
use std::sync::{Arc, RwLock};

/// Closes `waypoints` for `family` and builds the ribbon over a height field seeded with
/// `noise_seed`.
pub fn refresh(
	waypoints: &WaypointLoop,
	family: CurveFamily,
	width: f32,
	detail_step: f32,
	height_scale: f32,
	noise_seed: u32,
) -> Result<RibbonMesh, TrackError> {
	let builder = RibbonBuilder::new(width, detail_step, height_scale);
	builder.validate()?;
	let closed = ClosedLoop::close(waypoints, family)?;
	builder.build(&closed, &NoiseField::from_seed(noise_seed))
}

/// One complete, consistent generation result.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
	/// Counts published snapshots, starting at 0 for the initial build
	pub generation: u64,
	/// Seed the waypoints were drawn from
	pub point_seed: u64,
	pub noise_seed: u32,
	pub closed: ClosedLoop,
	pub mesh: RibbonMesh,
}

impl TrackSnapshot {
	pub fn family(&self) -> CurveFamily {
		self.closed.family()
	}

	pub fn waypoints(&self) -> &[Vec3] {
		self.closed.waypoints()
	}
}

/// The latest snapshot, shared with readers such as a renderer.
///
/// Readers clone the inner `Arc` and never observe a half-built mesh.
#[derive(Debug, Resource)]
pub struct PublishedTrack {
	current: RwLock<Arc<TrackSnapshot>>,
}

impl PublishedTrack {
	pub fn new(snapshot: TrackSnapshot) -> Self {
		Self { current: RwLock::new(Arc::new(snapshot)) }
	}

	pub fn load(&self) -> Arc<TrackSnapshot> {
		// a poisoned lock still holds a complete snapshot, the swap is a single assignment
		match self.current.read() {
			Ok(guard) => Arc::clone(&guard),
			Err(poisoned) => Arc::clone(&poisoned.into_inner()),
		}
	}

	fn publish(&self, snapshot: TrackSnapshot) -> Arc<TrackSnapshot> {
		let snapshot = Arc::new(snapshot);
		match self.current.write() {
			Ok(mut guard) => *guard = Arc::clone(&snapshot),
			Err(poisoned) => *poisoned.into_inner() = Arc::clone(&snapshot),
		}
		snapshot
	}
}

/// Owns the track parameters and republishes the mesh whenever one of them changes.
///
/// Every setter builds the new snapshot completely before touching any state. On error the
/// configuration, the family and the published snapshot are left as they were.
#[derive(Debug)]
pub struct Track {
	config: TrackConfig,
	previous_family: CurveFamily,
	noise: NoiseField,
	published: Arc<PublishedTrack>,
}

impl Track {
	pub fn new(config: TrackConfig) -> Result<Self, TrackError> {
		config.validate()?;
		let noise = NoiseField::new(config.noise);
		let point_seed = config.seed.seed();
		let snapshot = Self::build(&config, &noise, point_seed, 0)?;
		log::info!(
			"Built {} track: {} waypoints, {} vertices, {} triangles",
			snapshot.family(),
			snapshot.waypoints().len(),
			snapshot.mesh.vertex_count(),
			snapshot.mesh.triangle_count()
		);

		Ok(Self {
			previous_family: config.family,
			config,
			noise,
			published: Arc::new(PublishedTrack::new(snapshot)),
		})
	}

	pub fn config(&self) -> &TrackConfig {
		&self.config
	}

	pub fn family(&self) -> CurveFamily {
		self.config.family
	}

	/// Family the current snapshot was closed for before the last change.
	pub fn previous_family(&self) -> CurveFamily {
		self.previous_family
	}

	pub fn noise(&self) -> &NoiseField {
		&self.noise
	}

	/// Handle for readers; stays valid across refreshes.
	pub fn published(&self) -> Arc<PublishedTrack> {
		Arc::clone(&self.published)
	}

	pub fn snapshot(&self) -> Arc<TrackSnapshot> {
		self.published.load()
	}

	pub fn mesh(&self) -> RibbonMesh {
		self.snapshot().mesh.clone()
	}

	/// Switches the curve family, keeping the current waypoints.
	pub fn set_family(&mut self, family: CurveFamily) -> Result<(), TrackError> {
		let current = self.snapshot();
		let candidate = self.config.clone().with_family(family);
		candidate.validate()?;

		let transition = FamilyTransition::between(current.family(), family);
		let closed = transition.apply(current.closed.clone())?;
		let mesh = candidate.ribbon.build(&closed, &self.noise)?;

		if family != current.family() {
			self.previous_family = current.family();
		}
		self.config = candidate;
		self.publish(TrackSnapshot {
			generation: current.generation + 1,
			point_seed: current.point_seed,
			noise_seed: current.noise_seed,
			closed,
			mesh,
		});
		Ok(())
	}

	pub fn set_track_width(&mut self, track_width: f32) -> Result<(), TrackError> {
		self.rebuild(self.config.clone().with_track_width(track_width))
	}

	pub fn set_detail_step(&mut self, detail_step: f32) -> Result<(), TrackError> {
		self.rebuild(self.config.clone().with_detail_step(detail_step))
	}

	pub fn set_height_scale(&mut self, height_scale: f32) -> Result<(), TrackError> {
		self.rebuild(self.config.clone().with_height_scale(height_scale))
	}

	/// Changes the track length, which draws a new point cloud.
	pub fn set_point_count(&mut self, point_count: usize) -> Result<(), TrackError> {
		self.regenerate_with(self.config.clone().with_point_count(point_count))
	}

	/// Draws a new point cloud according to the seed policy.
	pub fn regenerate(&mut self) -> Result<(), TrackError> {
		self.regenerate_with(self.config.clone())
	}

	/// Swaps the height field for one seeded with `seed`, keeping the waypoints.
	pub fn reseed_noise(&mut self, seed: u32) -> Result<(), TrackError> {
		let current = self.snapshot();
		let noise = self.noise.reseeded(seed);
		let mesh = self.config.ribbon.build(&current.closed, &noise)?;

		self.config.noise = *noise.config();
		self.noise = noise;
		self.publish(TrackSnapshot {
			generation: current.generation + 1,
			point_seed: current.point_seed,
			noise_seed: seed,
			closed: current.closed.clone(),
			mesh,
		});
		Ok(())
	}

	fn rebuild(&mut self, candidate: TrackConfig) -> Result<(), TrackError> {
		candidate.validate()?;
		let current = self.snapshot();
		let mesh = candidate.ribbon.build(&current.closed, &self.noise)?;

		self.config = candidate;
		self.publish(TrackSnapshot {
			generation: current.generation + 1,
			point_seed: current.point_seed,
			noise_seed: current.noise_seed,
			closed: current.closed.clone(),
			mesh,
		});
		Ok(())
	}

	fn regenerate_with(&mut self, candidate: TrackConfig) -> Result<(), TrackError> {
		candidate.validate()?;
		let current = self.snapshot();
		let point_seed = candidate.seed.seed();
		let noise = if candidate.reseed_noise {
			// fold the 64 bit point seed into the 32 bit Perlin seed
			self.noise.reseeded((point_seed ^ (point_seed >> 32)) as u32)
		} else {
			self.noise.clone()
		};
		let snapshot = Self::build(&candidate, &noise, point_seed, current.generation + 1)?;

		if candidate.family != current.family() {
			self.previous_family = current.family();
		}
		self.config = candidate;
		self.config.noise = *noise.config();
		self.noise = noise;
		self.publish(snapshot);
		Ok(())
	}

	fn build(
		config: &TrackConfig,
		noise: &NoiseField,
		point_seed: u64,
		generation: u64,
	) -> Result<TrackSnapshot, TrackError> {
		let waypoints = PointGenerator::new(config.seed)
			.with_extent(config.extent)
			.generate_with_seed(config.point_count, point_seed)?;
		let closed = ClosedLoop::close(&waypoints, config.family)?;
		let mesh = config.ribbon.build(&closed, noise)?;

		Ok(TrackSnapshot { generation, point_seed, noise_seed: noise.seed(), closed, mesh })
	}

	fn publish(&self, snapshot: TrackSnapshot) {
		let snapshot = self.published.publish(snapshot);
		log::debug!(
			"Published track generation {} ({} triangles)",
			snapshot.generation,
			snapshot.mesh.triangle_count()
		);
	}
}
