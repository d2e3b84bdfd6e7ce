use std::ops::{Add, Div, Mul, Neg, Sub};

/// Numeric capability required by the segment evaluator and the
/// residual terms. Implement this for your automatic differentiation
/// type so the solver can evaluate Jacobians through the very same code
/// path used for plain `f64` residuals.
///
/// Only the four arithmetic operations, negation and constant lifting
/// are required.
pub trait Scalar:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Lifts a constant into this numeric type
    fn constant(value: f64) -> Self;
}

impl Scalar for f64 {
    fn constant(value: f64) -> Self {
        value
    }
}

impl Scalar for f32 {
    fn constant(value: f64) -> Self {
        value as f32
    }
}
