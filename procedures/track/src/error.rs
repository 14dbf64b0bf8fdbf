use crate::curve::CurveFamily;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	#[error("{family} needs at least {required} waypoints, the loop has {actual}")]
	OutOfRange { family: CurveFamily, required: usize, actual: usize },
}

impl TrackError {
	pub fn invalid_argument(reason: impl Into<String>) -> Self {
		Self::InvalidArgument(reason.into())
	}
}
