//! Continuity residual terms
use crate::{scalar::Scalar, Error};

pub(crate) mod plan;

/// Position of a node within the (left, center, right) triple of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Left node `a`
    Left,
    /// Center node `b`
    Center,
    /// Right node `c`
    Right,
}

/// Node parameter block read by a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Position,
    Velocity,
}

/// A residual term coupling three consecutive nodes (left a, center b,
/// right c), to be registered with a nonlinear least squares solver.
///
/// Terms are pure: [ResidualTerm::evaluate] only reads its inputs, so the
/// solver may instantiate it with `f64` for residuals and with its
/// automatic differentiation type for Jacobians.
pub trait ResidualTerm<const N: usize> {
    /// Parameter blocks read by [ResidualTerm::evaluate], in argument order.
    /// Solvers register the term against these blocks.
    const NODES: [(Node, Parameter); 5];
    /// Scale factor, fixed when the term is built
    fn scale(&self) -> f64;
    /// Evaluates the N residual components from the left node position and
    /// velocity, the center node `b` value this term reads and the right
    /// node position and velocity. Velocities are in block units.
    fn evaluate<T: Scalar>(
        &self,
        ra: &[T; N],
        va: &[T; N],
        b: &[T; N],
        rc: &[T; N],
        vc: &[T; N],
    ) -> [T; N];
    /// Same as [ResidualTerm::evaluate] on slices, for solvers handing
    /// out contiguous parameter blocks. Every slice must hold N components.
    fn evaluate_slices<T: Scalar>(
        &self,
        ra: &[T],
        va: &[T],
        b: &[T],
        rc: &[T],
        vc: &[T],
    ) -> Result<[T; N], Error> {
        Ok(self.evaluate(
            &block::<T, N>(ra)?,
            &block::<T, N>(va)?,
            &block::<T, N>(b)?,
            &block::<T, N>(rc)?,
            &block::<T, N>(vc)?,
        ))
    }
    /// Evaluates this term, fetching every parameter block listed in
    /// [ResidualTerm::NODES] through `read`.
    fn evaluate_with<T, F>(&self, mut read: F) -> [T; N]
    where
        T: Scalar,
        F: FnMut(Node, Parameter) -> [T; N],
    {
        let [ra, va, b, rc, vc] = Self::NODES.map(|(node, param)| read(node, param));
        self.evaluate(&ra, &va, &b, &rc, &vc)
    }
}

fn block<T: Scalar, const N: usize>(slice: &[T]) -> Result<[T; N], Error> {
    <[T; N]>::try_from(slice).map_err(|_| Error::DimensionMismatch {
        expected: N,
        got: slice.len(),
    })
}

/// Acceleration continuity across the center node.
/// The center value is the center node velocity `vb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelJump {
    scale: f64,
}

impl AccelJump {
    /// Builds a new [AccelJump] for given block duration
    pub fn new(tblock: f64) -> Self {
        Self {
            scale: 2.0 / (tblock * tblock),
        }
    }
}

impl Default for AccelJump {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<const N: usize> ResidualTerm<N> for AccelJump {
    const NODES: [(Node, Parameter); 5] = [
        (Node::Left, Parameter::Position),
        (Node::Left, Parameter::Velocity),
        (Node::Center, Parameter::Velocity),
        (Node::Right, Parameter::Position),
        (Node::Right, Parameter::Velocity),
    ];
    fn scale(&self) -> f64 {
        self.scale
    }
    fn evaluate<T: Scalar>(
        &self,
        ra: &[T; N],
        va: &[T; N],
        vb: &[T; N],
        rc: &[T; N],
        vc: &[T; N],
    ) -> [T; N] {
        // acceleration jump between a-b and b-c:
        //   8/tblock^2 * ((3*(rc-ra) - (vc+va)) / 4 - vb)
        let scale = T::constant(self.scale);
        std::array::from_fn(|i| {
            scale
                * (T::constant(3.0) * (rc[i] - ra[i])
                    - (vc[i] + va[i])
                    - T::constant(4.0) * vb[i])
        })
    }
}

/// Jerk continuity across the center node, usually attached to nodes
/// that were not directly observed. The center value is the center node
/// position `rb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp {
    scale: f64,
}

impl Clamp {
    /// Builds a new [Clamp] for given block duration
    pub fn new(tblock: f64) -> Self {
        Self {
            scale: 1.0 / (tblock * tblock * tblock),
        }
    }
}

impl Default for Clamp {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<const N: usize> ResidualTerm<N> for Clamp {
    const NODES: [(Node, Parameter); 5] = [
        (Node::Left, Parameter::Position),
        (Node::Left, Parameter::Velocity),
        (Node::Center, Parameter::Position),
        (Node::Right, Parameter::Position),
        (Node::Right, Parameter::Velocity),
    ];
    fn scale(&self) -> f64 {
        self.scale
    }
    fn evaluate<T: Scalar>(
        &self,
        ra: &[T; N],
        va: &[T; N],
        rb: &[T; N],
        rc: &[T; N],
        vc: &[T; N],
    ) -> [T; N] {
        // third derivative jump between a-b and b-c
        let scale = T::constant(self.scale);
        std::array::from_fn(|i| {
            scale
                * (T::constant(4.0) * rb[i] - T::constant(2.0) * (rc[i] + ra[i])
                    + (vc[i] - va[i]))
        })
    }
}
