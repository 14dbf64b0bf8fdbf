use super::{evaluator, CurveFamily};
use crate::error::TrackError;
use crate::points::WaypointLoop;
use bevy::prelude::*;

/// Waypoints plus the synthetic control points a curve family needs to close the loop.
///
/// Bezier segments only touch their first and last control points, so walking the raw
/// waypoints leaves the final segment either short of control points or ending somewhere
/// other than the loop start. Padding fixes both: chord points between the last and first
/// waypoint followed by a copy of the first waypoint, so that every segment has full arity
/// and the last one ends exactly where the first begins.
///
/// The padding is always appended at the end and its length is recorded, so it can be
/// stripped exactly when the family changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedLoop {
	family: CurveFamily,
	points: Vec<Vec3>,
	padding: usize,
}

impl ClosedLoop {
	/// Pads `waypoints` for `family`.
	pub fn close(waypoints: &WaypointLoop, family: CurveFamily) -> Result<Self, TrackError> {
		family.check_len(waypoints.len())?;

		let mut points = waypoints.points().to_vec();
		let padding = closure_padding(waypoints, family);
		points.extend(padding.iter().copied());

		Ok(Self { family, points, padding: padding.len() })
	}

	pub fn family(&self) -> CurveFamily {
		self.family
	}

	/// Waypoints followed by the closure padding.
	pub fn points(&self) -> &[Vec3] {
		&self.points
	}

	/// The unpadded waypoints.
	pub fn waypoints(&self) -> &[Vec3] {
		&self.points[..self.points.len() - self.padding]
	}

	/// Number of synthetic trailing points.
	pub fn padding(&self) -> usize {
		self.padding
	}

	/// Drops the synthetic trailing points.
	pub fn strip(self) -> WaypointLoop {
		let mut points = self.points;
		points.truncate(points.len() - self.padding);
		WaypointLoop::new(points)
	}

	pub fn segment_count(&self) -> usize {
		self.family.segment_count(self.waypoints().len())
	}

	/// First control point index of segment `segment`.
	pub fn segment_start(&self, segment: usize) -> usize {
		segment * self.family.stride()
	}

	pub fn evaluate(&self, segment_start: usize, t: f32) -> Result<Vec3, TrackError> {
		evaluator::evaluate(&self.points, self.family, segment_start, t)
	}
}

/// Synthetic points appended after the last waypoint for `family`.
///
/// Empty for Catmull-Rom, which interpolates the waypoints and wraps on its own. For the
/// Bezier families the padded loop satisfies `(len - 1) % stride == 0` and ends with a copy
/// of the first waypoint.
pub fn closure_padding(waypoints: &WaypointLoop, family: CurveFamily) -> Vec<Vec3> {
	let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) else {
		return Vec::new();
	};
	if !family.is_bezier() {
		return Vec::new();
	}

	let stride = family.stride();
	let remainder = (waypoints.len() - 1) % stride;
	let count = if remainder == 0 { stride } else { stride - remainder };

	let mut padding: Vec<Vec3> =
		(1..count).map(|k| last.lerp(first, k as f32 / count as f32)).collect();
	padding.push(first);
	padding
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::points::generate;

	fn waypoints(n: usize) -> WaypointLoop {
		(0..n)
			.map(|i| {
				let angle = i as f32 / n as f32 * std::f32::consts::TAU;
				Vec3::new(angle.cos(), angle.sin(), 0.0)
			})
			.collect::<Vec<_>>()
			.into()
	}

	#[test]
	fn test_catmull_rom_gets_no_closure_padding() {
		// the closure predicate is family in {quadratic, cubic}, never "always"
		let closed = ClosedLoop::close(&waypoints(13), CurveFamily::CatmullRom).unwrap();
		assert_eq!(closed.padding(), 0);
		assert_eq!(closed.points().len(), 13);
	}

	#[test]
	fn test_quadratic_odd_loop_gets_midpoint_and_first() {
		let loop_ = waypoints(13);
		let closed = ClosedLoop::close(&loop_, CurveFamily::QuadraticBezier).unwrap();
		assert_eq!(closed.padding(), 2);
		let midpoint = (loop_[12] + loop_[0]) / 2.0;
		assert!(closed.points()[13].distance(midpoint) < 1e-6);
		assert!(closed.points()[14].distance(loop_[0]) < 1e-6);
	}

	#[test]
	fn test_quadratic_even_loop_only_repeats_first() {
		let closed = ClosedLoop::close(&waypoints(12), CurveFamily::QuadraticBezier).unwrap();
		assert_eq!(closed.padding(), 1);
		assert_eq!(closed.segment_count(), 6);
	}

	#[test]
	fn test_cubic_padding_lengths() {
		for (n, padding) in [(13, 3), (12, 1), (14, 2)] {
			let closed = ClosedLoop::close(&waypoints(n), CurveFamily::CubicBezier).unwrap();
			assert_eq!(closed.padding(), padding, "loop of {}", n);
			assert_eq!((closed.points().len() - 1) % 3, 0);
			assert_eq!(closed.segment_count(), n.div_ceil(3));
		}
	}

	#[test]
	fn test_closing_segment_ends_at_loop_start() {
		let loop_ = generate(13, Some(21)).unwrap();
		for family in [CurveFamily::QuadraticBezier, CurveFamily::CubicBezier] {
			let closed = ClosedLoop::close(&loop_, family).unwrap();
			let last = closed.segment_start(closed.segment_count() - 1);
			let end = closed.evaluate(last, 1.0).unwrap();
			assert!(end.distance(loop_[0]) < 1e-5, "{} closes at {:?}", family, end);

			let near_end = closed.evaluate(last, 0.999).unwrap();
			assert!(near_end.distance(loop_[0]) < 1e-2);
		}
	}

	#[test]
	fn test_catmull_rom_last_segment_meets_first() {
		let loop_ = generate(9, Some(4)).unwrap();
		let closed = ClosedLoop::close(&loop_, CurveFamily::CatmullRom).unwrap();
		let last = closed.segment_start(closed.segment_count() - 1);
		let end = closed.evaluate(last, 1.0).unwrap();
		let start = closed.evaluate(0, 0.0).unwrap();
		assert!(end.distance(start) < 1e-5);
	}

	#[test]
	fn test_strip_restores_waypoints() {
		let loop_ = waypoints(10);
		let closed = ClosedLoop::close(&loop_, CurveFamily::CubicBezier).unwrap();
		assert_eq!(closed.waypoints(), loop_.points());
		assert_eq!(closed.strip(), loop_);
	}

	#[test]
	fn test_too_short_to_close() {
		assert!(matches!(
			ClosedLoop::close(&waypoints(3), CurveFamily::CubicBezier),
			Err(TrackError::OutOfRange { .. })
		));
	}
}
