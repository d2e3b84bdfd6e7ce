#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constraint;
mod scalar;
mod segment;
mod spline;

// pub export
pub use spline::Error;


// prelude
pub mod prelude {
    pub use crate::cfg::{Config, FillMethod};
    pub use crate::constraint::plan::{Attachment, ConstraintPlan, TermKind};
    pub use crate::constraint::{AccelJump, Clamp, Node, Parameter, ResidualTerm};
    pub use crate::scalar::Scalar;
    pub use crate::segment::{end_point_cubic, end_point_cubic_state, SegmentState};
    pub use crate::spline::{TrajectorySpline, TrajectorySpline3};
    // re-export
    pub use nalgebra::{SVector, Vector3};
}
