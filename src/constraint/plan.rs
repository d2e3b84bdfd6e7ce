use log::debug;
use nalgebra::SVector;

use super::{AccelJump, Clamp, Node, Parameter, ResidualTerm};
use crate::spline::TrajectorySpline;

/// Residual term kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// [AccelJump]
    AccelJump,
    /// [Clamp]
    Clamp,
}

/// One residual term attached to the node triple centered on an interior
/// node. Only a [ConstraintPlan] creates attachments, so the center always
/// has a left and a right neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attachment {
    kind: TermKind,
    center: usize,
}

impl Attachment {
    pub(crate) fn new(kind: TermKind, center: usize) -> Self {
        debug_assert!(center > 0, "attachment centered on first node");
        Self { kind, center }
    }
    /// Attached term kind
    pub fn kind(&self) -> TermKind {
        self.kind
    }
    /// Center node
    pub fn center(&self) -> usize {
        self.center
    }
    /// (left, center, right) node indices
    pub fn nodes(&self) -> (usize, usize, usize) {
        (self.node(Node::Left), self.center, self.node(Node::Right))
    }
    /// Index of given node of the triple
    pub fn node(&self, node: Node) -> usize {
        match node {
            Node::Left => self.center.saturating_sub(1),
            Node::Center => self.center,
            Node::Right => self.center.saturating_add(1),
        }
    }
}

/// Continuity terms to register with the solver for a given spline.
/// Every interior node receives an [AccelJump], interior nodes that were
/// not directly observed also receive a [Clamp].
/// The plan only holds node indices: node storage stays owned by the spline.
#[derive(Debug, Clone)]
pub struct ConstraintPlan {
    accel_jump: AccelJump,
    clamp: Clamp,
    attachments: Vec<Attachment>,
}

impl ConstraintPlan {
    /// Builds the [ConstraintPlan] from current missing flags
    pub fn new<const N: usize>(spline: &TrajectorySpline<N>) -> Self {
        let mut attachments = Vec::with_capacity(2 * spline.nodes());
        for b in 1..spline.segments() {
            attachments.push(Attachment::new(TermKind::AccelJump, b));
            if spline.is_missing(b) {
                attachments.push(Attachment::new(TermKind::Clamp, b));
            }
        }
        debug!(
            "constraint plan: {} terms over {} interior nodes",
            attachments.len(),
            spline.segments() - 1
        );
        Self {
            accel_jump: AccelJump::new(spline.tblock()),
            clamp: Clamp::new(spline.tblock()),
            attachments,
        }
    }
    /// [AccelJump] shared by all acceleration attachments
    pub fn accel_jump(&self) -> &AccelJump {
        &self.accel_jump
    }
    /// [Clamp] shared by all clamp attachments
    pub fn clamp(&self) -> &Clamp {
        &self.clamp
    }
    /// Attached terms, in registration order
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
    /// Number of attached terms
    pub fn len(&self) -> usize {
        self.attachments.len()
    }
    /// True if no term is attached (single segment spline)
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
    /// Evaluates every attached term on current node values
    pub fn residuals<const N: usize>(&self, spline: &TrajectorySpline<N>) -> Vec<[f64; N]> {
        let (r, v) = (spline.positions(), spline.velocities());
        self.attachments
            .iter()
            .map(|attachment| {
                let read = |node: Node, param: Parameter| {
                    let i = attachment.node(node);
                    match param {
                        Parameter::Position => array(&r[i]),
                        Parameter::Velocity => array(&v[i]),
                    }
                };
                match attachment.kind() {
                    TermKind::AccelJump => self.accel_jump.evaluate_with(read),
                    TermKind::Clamp => self.clamp.evaluate_with(read),
                }
            })
            .collect()
    }
    /// Half the sum of squared residuals
    pub fn cost<const N: usize>(&self, spline: &TrajectorySpline<N>) -> f64 {
        self.residuals(spline)
            .iter()
            .flat_map(|res| res.iter())
            .map(|r| r * r)
            .sum::<f64>()
            / 2.0
    }
}

fn array<const N: usize>(v: &SVector<f64, N>) -> [f64; N] {
    std::array::from_fn(|k| v[k])
}
