use crate::error::TrackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The parametric curve used to join waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveFamily {
	/// Three control points per segment, interpolates every other waypoint.
	QuadraticBezier,
	/// Four control points per segment, interpolates every third waypoint.
	#[default]
	CubicBezier,
	/// Uniform Catmull-Rom, interpolates every waypoint.
	CatmullRom,
}

impl CurveFamily {
	pub const ALL: [CurveFamily; 3] =
		[CurveFamily::QuadraticBezier, CurveFamily::CubicBezier, CurveFamily::CatmullRom];

	/// Waypoints consumed per segment.
	pub fn stride(&self) -> usize {
		match self {
			CurveFamily::QuadraticBezier => 2,
			CurveFamily::CubicBezier => 3,
			CurveFamily::CatmullRom => 1,
		}
	}

	/// Control points touched by a single evaluation.
	pub fn control_points(&self) -> usize {
		match self {
			CurveFamily::QuadraticBezier => 3,
			CurveFamily::CubicBezier | CurveFamily::CatmullRom => 4,
		}
	}

	/// Smallest waypoint loop the family can evaluate.
	pub fn min_waypoints(&self) -> usize {
		match self {
			CurveFamily::QuadraticBezier => 3,
			CurveFamily::CubicBezier | CurveFamily::CatmullRom => 4,
		}
	}

	/// Bezier families only pass through segment end points, so closing the loop needs
	/// synthetic control points. Catmull-Rom wraps on its own.
	pub fn is_bezier(&self) -> bool {
		matches!(self, CurveFamily::QuadraticBezier | CurveFamily::CubicBezier)
	}

	/// Number of segments needed to walk a closed loop of `waypoints` points.
	pub fn segment_count(&self, waypoints: usize) -> usize {
		waypoints.div_ceil(self.stride())
	}

	pub fn check_len(&self, len: usize) -> Result<(), TrackError> {
		if len < self.min_waypoints() {
			return Err(TrackError::OutOfRange {
				family: *self,
				required: self.min_waypoints(),
				actual: len,
			});
		}
		Ok(())
	}
}

impl fmt::Display for CurveFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			CurveFamily::QuadraticBezier => "quadratic",
			CurveFamily::CubicBezier => "cubic",
			CurveFamily::CatmullRom => "catmull-rom",
		};
		write!(f, "{}", name)
	}
}

impl FromStr for CurveFamily {
	type Err = TrackError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"quadratic" | "quadratic-bezier" => Ok(CurveFamily::QuadraticBezier),
			"cubic" | "cubic-bezier" => Ok(CurveFamily::CubicBezier),
			"catmull-rom" | "catmullrom" => Ok(CurveFamily::CatmullRom),
			other => Err(TrackError::invalid_argument(format!("unknown curve family: {}", other))),
		}
	}
}
