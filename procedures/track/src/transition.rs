use crate::curve::{ClosedLoop, CurveFamily};
use crate::error::TrackError;

/// What a change of curve family does to the closure padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
	/// Same family, the closed loop is reused as-is.
	Unchanged,
	/// Catmull-Rom to a Bezier family, padding is added.
	AddClosure,
	/// Bezier family to Catmull-Rom, stale padding is removed.
	StripClosure,
	/// Between the two Bezier families, padding is rebuilt for the new stride.
	Reclose,
}

/// An explicit `(previous, next)` curve family change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyTransition {
	pub previous: CurveFamily,
	pub next: CurveFamily,
}

impl FamilyTransition {
	pub fn between(previous: CurveFamily, next: CurveFamily) -> Self {
		Self { previous, next }
	}

	pub fn kind(&self) -> TransitionKind {
		match (self.previous.is_bezier(), self.next.is_bezier()) {
			_ if self.previous == self.next => TransitionKind::Unchanged,
			(false, true) => TransitionKind::AddClosure,
			(true, false) => TransitionKind::StripClosure,
			_ => TransitionKind::Reclose,
		}
	}

	/// Re-closes `closed` for the next family.
	///
	/// The previous family's synthetic points are always stripped before the new padding is
	/// computed, so padding never accumulates across transitions.
	pub fn apply(&self, closed: ClosedLoop) -> Result<ClosedLoop, TrackError> {
		if closed.family() != self.previous {
			return Err(TrackError::invalid_argument(format!(
				"transition from {} applied to a loop closed for {}",
				self.previous,
				closed.family()
			)));
		}

		let kind = self.kind();
		if kind == TransitionKind::Unchanged {
			return Ok(closed);
		}

		log::debug!("Curve family {} -> {} ({:?})", self.previous, self.next, kind);
		let waypoints = closed.strip();
		ClosedLoop::close(&waypoints, self.next)
	}
}
