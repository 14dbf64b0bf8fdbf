use crate::curve::ClosedLoop;
use crate::error::TrackError;
use crate::noise::NoiseField;
use bevy::prelude::*;
use ply::TriangleMesh;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Double strip of triangles following the track.
///
/// Every sample contributes a left and a right rail vertex, in that order. Consecutive
/// samples are joined by two triangles, so `vertices.len() == 2 * samples` and
/// `indices.len() == 2 * (samples - 1)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RibbonMesh {
	pub vertices: Vec<[f32; 3]>,
	pub indices: Vec<[u32; 3]>,
}

impl RibbonMesh {
	pub fn sample_count(&self) -> usize {
		self.vertices.len() / 2
	}

	pub fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	pub fn triangle_count(&self) -> usize {
		self.indices.len()
	}

	/// Vertex buffer as a flat `x, y, z, x, y, z, ...` array.
	pub fn flat_vertices(&self) -> Vec<f32> {
		self.vertices.iter().flatten().copied().collect()
	}

	/// Index buffer as a flat array, three entries per triangle.
	pub fn flat_indices(&self) -> Vec<u32> {
		self.indices.iter().flatten().copied().collect()
	}
}

impl TriangleMesh for RibbonMesh {
	fn positions(&self) -> &[[f32; 3]] {
		&self.vertices
	}

	fn triangles(&self) -> &[[u32; 3]] {
		&self.indices
	}
}

#[derive(Debug, Clone, Copy)]
struct RailPair {
	left: Vec3,
	right: Vec3,
}

/// Walks a closed loop and emits the track ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonBuilder {
	/// Distance between the two rails
	pub track_width: f32,
	/// Step in local curve parameter between samples
	pub detail_step: f32,
	/// Multiplier applied to the noise height
	pub height_scale: f32,
}

impl Default for RibbonBuilder {
	fn default() -> Self {
		Self { track_width: 0.1, detail_step: 0.01, height_scale: 0.5 }
	}
}

impl RibbonBuilder {
	pub fn new(track_width: f32, detail_step: f32, height_scale: f32) -> Self {
		Self { track_width, detail_step, height_scale }
	}

	pub fn with_track_width(mut self, track_width: f32) -> Self {
		self.track_width = track_width;
		self
	}

	pub fn with_detail_step(mut self, detail_step: f32) -> Self {
		self.detail_step = detail_step;
		self
	}

	pub fn with_height_scale(mut self, height_scale: f32) -> Self {
		self.height_scale = height_scale;
		self
	}

	pub fn validate(&self) -> Result<(), TrackError> {
		if !(self.track_width.is_finite() && self.track_width > 0.0) {
			return Err(TrackError::invalid_argument(format!(
				"track width must be positive, got {}",
				self.track_width
			)));
		}
		if !(self.detail_step.is_finite() && self.detail_step > 0.0) {
			return Err(TrackError::invalid_argument(format!(
				"detail step must be positive, got {}",
				self.detail_step
			)));
		}
		if self.steps_per_segment() >= u32::MAX as f64 {
			return Err(TrackError::invalid_argument(format!(
				"detail step {} is too fine for a u32 index buffer",
				self.detail_step
			)));
		}
		if !self.height_scale.is_finite() {
			return Err(TrackError::invalid_argument(format!(
				"height scale must be finite, got {}",
				self.height_scale
			)));
		}
		Ok(())
	}

	/// Samples taken on each segment, `t = 0` and `t = 1` included.
	///
	/// Saturates for steps that [`RibbonBuilder::validate`] rejects.
	pub fn samples_per_segment(&self) -> usize {
		(self.steps_per_segment() as usize).saturating_add(1)
	}

	fn steps_per_segment(&self) -> f64 {
		// tolerance so that steps like 0.01 land on t = 1 despite rounding
		(1.0 / self.detail_step as f64 + 1e-4).floor()
	}

	pub fn build(&self, closed: &ClosedLoop, noise: &NoiseField) -> Result<RibbonMesh, TrackError> {
		self.validate()?;
		closed.family().check_len(closed.points().len())?;

		let segments = closed.segment_count();
		let samples = segments
			.checked_mul(self.samples_per_segment())
			.filter(|samples| samples.checked_mul(2).is_some_and(|v| v <= u32::MAX as usize))
			.ok_or_else(|| {
				TrackError::invalid_argument(format!(
					"{} segments at detail step {} overflow a u32 index buffer",
					segments, self.detail_step
				))
			})?;

		// ---------- sample segments (parallelized) -------------------------------
		let start_time = std::time::Instant::now();
		let sampled = (0..segments)
			.into_par_iter()
			.map(|segment| self.sample_segment(closed, noise, segment))
			.collect::<Result<Vec<Vec<RailPair>>, TrackError>>()?;
		let duration = start_time.elapsed();
		log::debug!("Sampled {} segments in {:?}", segments, duration);

		// ---------- stitch ---------------------------------------------------------
		let start_time = std::time::Instant::now();
		let mut mesh = RibbonMesh {
			vertices: Vec::with_capacity(samples * 2),
			indices: Vec::with_capacity(samples.saturating_sub(1) * 2),
		};
		for pair in sampled.into_iter().flatten() {
			let current = mesh.vertices.len() as u32;
			mesh.vertices.push(pair.left.to_array());
			mesh.vertices.push(pair.right.to_array());

			if current > 0 {
				let previous = current - 2;
				mesh.indices.push([previous, previous + 1, current]);
				mesh.indices.push([previous + 1, current + 1, current]);
			}
		}
		let duration = start_time.elapsed();
		log::debug!("Stitched {} triangles in {:?}", mesh.indices.len(), duration);

		Ok(mesh)
	}

	fn sample_segment(
		&self,
		closed: &ClosedLoop,
		noise: &NoiseField,
		segment: usize,
	) -> Result<Vec<RailPair>, TrackError> {
		let start = closed.segment_start(segment);
		let steps = self.samples_per_segment();
		let epsilon = self.detail_step / 100.0;
		let half_width = self.track_width * 0.5;

		let mut pairs = Vec::with_capacity(steps);
		let mut last_normal = None;
		for step in 0..steps {
			let t = (step as f32 * self.detail_step).min(1.0);
			let position = closed.evaluate(start, t)?;
			// past t = 1 the wrapped window of the closing segment is not its continuation,
			// so the end of a segment differences backwards
			let tangent = if t + epsilon > 1.0 && t >= epsilon {
				position - closed.evaluate(start, t - epsilon)?
			} else {
				closed.evaluate(start, t + epsilon)? - position
			};

			// coincident control points leave only rounding noise, keep the previous orientation
			let noise_floor = f32::EPSILON * 8.0 * position.length().max(1.0);
			let normal = match tangent.cross(Vec3::Z).try_normalize() {
				Some(normal) if tangent.length() > noise_floor => normal * half_width,
				_ => last_normal.unwrap_or(Vec3::Y * half_width),
			};
			last_normal = Some(normal);

			let height = noise.height(position.x, position.y) * self.height_scale;
			let lift = Vec3::Z * height;
			pairs.push(RailPair { left: position - normal + lift, right: position + normal + lift });
		}

		Ok(pairs)
	}
}
