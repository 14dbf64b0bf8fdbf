use super::CurveFamily;
use crate::error::TrackError;
use bevy::prelude::*;

/// Resolves the control point indices for a window starting at `segment_start`.
///
/// Indices past the end of the loop do not wrap with a modulo. The first slot that
/// overflows is re-anchored to `0`, the following ones to `1`, `2`, ...
pub fn control_indices(len: usize, family: CurveFamily, segment_start: usize) -> [usize; 4] {
	let mut indices = [0; 4];
	let mut overflow = None;
	for (slot, index) in indices.iter_mut().enumerate().take(family.control_points()) {
		let raw = segment_start.saturating_add(slot);
		if raw >= len && overflow.is_none() {
			overflow = Some(slot);
		}
		*index = match overflow {
			Some(first) => slot - first,
			None => raw,
		};
	}
	indices
}

/// Evaluates the segment starting at `segment_start` at local parameter `t`.
///
/// Only x and y are blended, the returned point has `z = 0`. Parameters past `1` step onto
/// the next segment, which is how tangent estimates that overshoot a segment end resolve.
pub fn evaluate(
	points: &[Vec3],
	family: CurveFamily,
	segment_start: usize,
	t: f32,
) -> Result<Vec3, TrackError> {
	family.check_len(points.len())?;
	if !t.is_finite() {
		return Err(TrackError::invalid_argument(format!("curve parameter must be finite, got {}", t)));
	}

	let (segment_start, t) = normalize_parameter(family, segment_start, t)?;
	let [i0, i1, i2, i3] = control_indices(points.len(), family, segment_start);
	let p0 = points[i0].truncate();
	let p1 = points[i1].truncate();
	let p2 = points[i2].truncate();

	let position = match family {
		CurveFamily::QuadraticBezier => quadratic_bezier(p0, p1, p2, t),
		CurveFamily::CubicBezier => cubic_bezier(p0, p1, p2, points[i3].truncate(), t),
		CurveFamily::CatmullRom => catmull_rom(p0, p1, p2, points[i3].truncate(), t),
	};

	Ok(position.extend(0.0))
}

/// Moves whole steps of `t` past `1` onto the following segments.
///
/// `t` in `(k, k + 1]` lands on the segment `k` strides ahead with local parameter `t - k`.
fn normalize_parameter(
	family: CurveFamily,
	segment_start: usize,
	t: f32,
) -> Result<(usize, f32), TrackError> {
	if t <= 1.0 {
		return Ok((segment_start, t));
	}

	// f64 keeps the subtraction exact for every f32 below 2^53
	let whole = (t as f64).ceil() - 1.0;
	let local = ((t as f64 - whole) as f32).clamp(0.0, 1.0);
	let start = (whole as usize)
		.checked_mul(family.stride())
		.and_then(|offset| segment_start.checked_add(offset))
		.ok_or_else(|| {
			TrackError::invalid_argument(format!("curve parameter {} overflows the segment index", t))
		})?;

	Ok((start, local))
}

pub fn quadratic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
	let mt = 1.0 - t;
	p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
}

pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
	let t2 = t * t;
	let t3 = t2 * t;
	let mt = 1.0 - t;
	let mt2 = mt * mt;
	let mt3 = mt2 * mt;

	// B(t) = (1-t)³P0 + 3(1-t)²tP1 + 3(1-t)t²P2 + t³P3
	p0 * mt3 + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * t3
}

/// Uniform Catmull-Rom, runs from `p1` at `t = 0` to `p2` at `t = 1`.
pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
	let t2 = t * t;
	let t3 = t2 * t;

	// P(t) = 0.5 * [(2P1) + (-P0 + P2)t + (2P0 - 5P1 + 4P2 - P3)t² + (-P0 + 3P1 - 3P2 + P3)t³]
	let c0 = p1 * 2.0;
	let c1 = p2 - p0;
	let c2 = p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3;
	let c3 = p1 * 3.0 - p0 - p2 * 3.0 + p3;

	(c0 + c1 * t + c2 * t2 + c3 * t3) * 0.5
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square() -> Vec<Vec3> {
		vec![
			Vec3::new(0.0, 0.0, 0.0),
			Vec3::new(1.0, 0.0, 0.0),
			Vec3::new(1.0, 1.0, 0.0),
			Vec3::new(0.0, 1.0, 0.0),
			Vec3::new(-1.0, 1.0, 0.0),
			Vec3::new(-1.0, 0.0, 0.0),
		]
	}

	#[test]
	fn test_indices_in_range() {
		assert_eq!(control_indices(6, CurveFamily::CatmullRom, 1), [1, 2, 3, 4]);
		assert_eq!(control_indices(6, CurveFamily::QuadraticBezier, 2), [2, 3, 4, 0]);
	}

	#[test]
	fn test_overflowing_tail_restarts_at_zero() {
		assert_eq!(control_indices(6, CurveFamily::CatmullRom, 4), [4, 5, 0, 1]);
		assert_eq!(control_indices(6, CurveFamily::CubicBezier, 5), [5, 0, 1, 2]);
		// a window entirely past the end is re-anchored at the loop start
		assert_eq!(control_indices(6, CurveFamily::CubicBezier, 9), [0, 1, 2, 3]);
	}

	#[test]
	fn test_catmull_rom_interpolates_inner_points() {
		let points = square();
		let start = evaluate(&points, CurveFamily::CatmullRom, 0, 0.0).unwrap();
		let end = evaluate(&points, CurveFamily::CatmullRom, 0, 1.0).unwrap();
		assert!(start.distance(points[1]) < 1e-6);
		assert!(end.distance(points[2]) < 1e-6);
	}

	#[test]
	fn test_bezier_endpoints() {
		let points = square();
		let quad_end = evaluate(&points, CurveFamily::QuadraticBezier, 0, 1.0).unwrap();
		assert!(quad_end.distance(points[2]) < 1e-6);

		let cubic_start = evaluate(&points, CurveFamily::CubicBezier, 0, 0.0).unwrap();
		let cubic_end = evaluate(&points, CurveFamily::CubicBezier, 0, 1.0).unwrap();
		assert!(cubic_start.distance(points[0]) < 1e-6);
		assert!(cubic_end.distance(points[3]) < 1e-6);
	}

	#[test]
	fn test_catmull_rom_is_finite_everywhere() {
		let points = square();
		for start in 0..points.len() {
			for step in 0..=10 {
				let p = evaluate(&points, CurveFamily::CatmullRom, start, step as f32 / 10.0)
					.unwrap();
				assert!(p.is_finite());
			}
		}
	}

	#[test]
	fn test_oversampled_parameter_moves_to_next_segment() {
		let points = square();
		let family = CurveFamily::CubicBezier;
		let overshoot = evaluate(&points, family, 0, 1.25).unwrap();
		let next = evaluate(&points, family, family.stride(), 0.25).unwrap();
		assert_eq!(overshoot, next);
	}

	#[test]
	fn test_evaluation_drops_height() {
		let points: Vec<Vec3> = square().into_iter().map(|p| p + Vec3::Z * 4.0).collect();
		let p = evaluate(&points, CurveFamily::CatmullRom, 2, 0.5).unwrap();
		assert_eq!(p.z, 0.0);
	}

	#[test]
	fn test_short_loops_are_out_of_range() {
		let points = &square()[..3];
		assert!(evaluate(points, CurveFamily::QuadraticBezier, 0, 0.5).is_ok());
		assert!(matches!(
			evaluate(points, CurveFamily::CubicBezier, 0, 0.5),
			Err(TrackError::OutOfRange { required: 4, actual: 3, .. })
		));
		assert!(matches!(
			evaluate(points, CurveFamily::CatmullRom, 0, 0.5),
			Err(TrackError::OutOfRange { .. })
		));
	}

	#[test]
	fn test_large_parameters_return() {
		let points = square();
		let family = CurveFamily::CatmullRom;
		let far = evaluate(&points, family, 0, 1.0e8).unwrap();
		assert!(far.is_finite());

		let wrapped = evaluate(&points, family, 0, 3.5).unwrap();
		let direct = evaluate(&points, family, 3, 0.5).unwrap();
		assert_eq!(wrapped, direct);
	}

	#[test]
	fn test_parameter_overflowing_segment_index() {
		let result = evaluate(&square(), CurveFamily::CubicBezier, usize::MAX - 1, 2.0);
		assert!(matches!(result, Err(TrackError::InvalidArgument(_))));
		let result = evaluate(&square(), CurveFamily::CubicBezier, 0, f32::MAX);
		assert!(matches!(result, Err(TrackError::InvalidArgument(_))));
	}

	#[test]
	fn test_control_indices_near_usize_max() {
		assert_eq!(control_indices(6, CurveFamily::CatmullRom, usize::MAX), [0, 1, 2, 3]);
	}

	#[test]
	fn test_rejects_nan_parameter() {
		assert!(matches!(
			evaluate(&square(), CurveFamily::CatmullRom, 0, f32::NAN),
			Err(TrackError::InvalidArgument(_))
		));
	}
}
