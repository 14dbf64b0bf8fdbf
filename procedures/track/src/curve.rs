pub mod closure;
pub mod evaluator;
pub mod family;

pub use closure::{closure_padding, ClosedLoop};
pub use evaluator::{control_indices, evaluate};
pub use family::CurveFamily;
