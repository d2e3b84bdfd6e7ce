//! Cubic segment evaluator
use crate::scalar::Scalar;

/// Position, velocity and acceleration on a single segment,
/// expressed in local (block) time units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentState<T> {
    pub position: T,
    pub velocity: T,
    pub acceleration: T,
}

/// Evaluates the cubic matching position `rm` and velocity `vm` at local
/// time -0.5 and position `rp` and velocity `vp` at local time +0.5.
/// `t` is not restricted to [-0.5, 0.5]: outside that range the polynomial
/// simply extrapolates.
pub fn end_point_cubic<T: Scalar>(rm: T, vm: T, rp: T, vp: T, t: T) -> T {
    end_point_cubic_state(rm, vm, rp, vp, t).position
}

/// Same as [end_point_cubic] but also returns first and second derivatives.
pub fn end_point_cubic_state<T: Scalar>(rm: T, vm: T, rp: T, vp: T, t: T) -> SegmentState<T> {
    let (a0, a1, a2, a3) = coefficients(rm, vm, rp, vp);
    SegmentState {
        position: t * (t * (t * a3 + a2) + a1) + a0,
        velocity: t * (t * T::constant(3.0) * a3 + T::constant(2.0) * a2) + a1,
        acceleration: t * T::constant(6.0) * a3 + T::constant(2.0) * a2,
    }
}

/// Polynomial coefficients (a0, a1, a2, a3), lowest order first.
pub(crate) fn coefficients<T: Scalar>(rm: T, vm: T, rp: T, vp: T) -> (T, T, T, T) {
    let (rs, rd, vs, vd) = (rp + rm, rp - rm, vp + vm, vp - vm);
    let a0 = (T::constant(4.0) * rs - vd) / T::constant(8.0);
    let a1 = (T::constant(6.0) * rd - vs) / T::constant(4.0);
    let a2 = vd / T::constant(2.0);
    let a3 = -(T::constant(2.0) * rd) + vs;
    (a0, a1, a2, a3)
}
