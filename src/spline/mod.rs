//! Trajectory spline
use log::{debug, trace};
use nalgebra::SVector;
use thiserror::Error;

use crate::{cfg::Config, segment::end_point_cubic_state};

pub(crate) mod fill;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("block duration must be strictly positive, got {0}")]
    NonPositiveBlock(f64),
    #[error("spline needs at least one segment")]
    NoSegments,
    #[error("{0} segments: node storage does not fit in memory")]
    TooManySegments(usize),
    #[error("start time must be finite, got {0}")]
    NonFiniteStart(f64),
    #[error("node #{index} out of range ({nodes} nodes)")]
    NodeOutOfRange { index: usize, nodes: usize },
    #[error("expecting {expected} components, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("unknown fill method \"{0}\"")]
    UnknownFillMethod(String),
}

/// Piecewise cubic trajectory over `segments` uniform blocks.
///
/// Each block is the Hermite cubic joining its two end nodes. Node
/// positions are stored as is, node velocities are stored in block units
/// (physical velocity multiplied by the block duration), which is the
/// layout [crate::prelude::AccelJump] and [crate::prelude::Clamp] expect.
/// Node storage is sized once at construction: the solver may read and
/// write node values in place but never resize them.
#[derive(Debug, Clone)]
pub struct TrajectorySpline<const N: usize> {
    cfg: Config,
    position: Vec<SVector<f64, N>>,
    velocity: Vec<SVector<f64, N>>,
    missing: Vec<bool>,
}

/// Three dimensional [TrajectorySpline]
pub type TrajectorySpline3 = TrajectorySpline<3>;

impl<const N: usize> TrajectorySpline<N> {
    /// Builds a new [TrajectorySpline] with all nodes zeroed and observed.
    pub fn new(cfg: Config) -> Result<Self, Error> {
        cfg.validate()?;
        let nodes = cfg.nodes()?;
        let bytes = nodes.checked_mul(std::mem::size_of::<SVector<f64, N>>());
        if bytes.is_none_or(|bytes| bytes > isize::MAX as usize) {
            return Err(Error::TooManySegments(cfg.segments));
        }
        debug!(
            "spline: {} segments, tblock={}, tstart={}",
            cfg.segments, cfg.tblock, cfg.tstart
        );
        Ok(Self {
            position: vec![SVector::<f64, N>::zeros(); nodes],
            velocity: vec![SVector::<f64, N>::zeros(); nodes],
            missing: vec![false; nodes],
            cfg,
        })
    }
    /// Returns [Config] this spline was built with
    pub fn config(&self) -> &Config {
        &self.cfg
    }
    /// Number of segments
    pub fn segments(&self) -> usize {
        self.cfg.segments
    }
    /// Number of nodes (segments + 1)
    pub fn nodes(&self) -> usize {
        self.position.len()
    }
    /// Block duration
    pub fn tblock(&self) -> f64 {
        self.cfg.tblock
    }
    /// Start time of the first segment
    pub fn tstart(&self) -> f64 {
        self.cfg.tstart
    }
    /// End time of the last segment
    pub fn end(&self) -> f64 {
        self.cfg.end()
    }
    /// Time of node `i`
    pub fn node_time(&self, i: usize) -> f64 {
        self.cfg.tstart + i as f64 * self.cfg.tblock
    }
    /// True if `t` lies within the covered time span
    pub fn contains(&self, t: f64) -> bool {
        t >= self.cfg.tstart && t <= self.end()
    }
    /// Converts absolute time into (segment index, local time).
    /// The index is clamped to the first or last segment, local time is not:
    /// out of span queries extrapolate the boundary segment's cubic.
    pub fn time_to_segment(&self, t: f64) -> (usize, f64) {
        let x = (t - self.cfg.tstart) / self.cfg.tblock;
        let last = (self.cfg.segments - 1) as f64;
        let i = x.floor();
        let i = if i.is_nan() { 0 } else { i.clamp(0.0, last) as usize };
        (i, x - (i as f64 + 0.5))
    }
    /// Position at time `t`
    pub fn position(&self, t: f64) -> SVector<f64, N> {
        self.evaluate(t).0
    }
    /// Position and velocity at time `t`
    pub fn position_velocity(&self, t: f64) -> (SVector<f64, N>, SVector<f64, N>) {
        let (r, v, _) = self.evaluate(t);
        (r, v)
    }
    /// Position, velocity and acceleration at time `t`
    pub fn position_velocity_acceleration(
        &self,
        t: f64,
    ) -> (SVector<f64, N>, SVector<f64, N>, SVector<f64, N>) {
        self.evaluate(t)
    }
    fn evaluate(&self, t: f64) -> (SVector<f64, N>, SVector<f64, N>, SVector<f64, N>) {
        let (i, tf) = self.time_to_segment(t);
        if !self.contains(t) {
            trace!("t={} out of span: extrapolating segment #{} @{}", t, i, tf);
        }
        let tblock = self.cfg.tblock;
        let (r_m, v_m) = (&self.position[i], &self.velocity[i]);
        let (r_p, v_p) = (&self.position[i + 1], &self.velocity[i + 1]);

        let mut r = SVector::<f64, N>::zeros();
        let mut v = SVector::<f64, N>::zeros();
        let mut a = SVector::<f64, N>::zeros();
        for k in 0..N {
            let state = end_point_cubic_state(r_m[k], v_m[k], r_p[k], v_p[k], tf);
            r[k] = state.position;
            v[k] = state.velocity / tblock;
            a[k] = state.acceleration / (tblock * tblock);
        }
        (r, v, a)
    }
    /// Loads node `i` from a position, a physical velocity and a missing flag.
    pub fn set_node(
        &mut self,
        i: usize,
        position: SVector<f64, N>,
        velocity: SVector<f64, N>,
        missing: bool,
    ) -> Result<(), Error> {
        let nodes = self.nodes();
        if i >= nodes {
            return Err(Error::NodeOutOfRange { index: i, nodes });
        }
        self.position[i] = position;
        self.velocity[i] = velocity * self.cfg.tblock;
        self.missing[i] = missing;
        Ok(())
    }
    /// Marks node `i` as missing (not directly observed)
    pub fn set_missing(&mut self, i: usize, missing: bool) -> Result<(), Error> {
        let nodes = self.nodes();
        let flag = self
            .missing
            .get_mut(i)
            .ok_or(Error::NodeOutOfRange { index: i, nodes })?;
        *flag = missing;
        Ok(())
    }
    /// Position of node `i`
    pub fn node_position(&self, i: usize) -> Option<SVector<f64, N>> {
        self.position.get(i).copied()
    }
    /// Physical velocity of node `i`
    pub fn node_velocity(&self, i: usize) -> Option<SVector<f64, N>> {
        self.velocity.get(i).map(|v| v / self.cfg.tblock)
    }
    /// True if node `i` was not directly observed
    pub fn is_missing(&self, i: usize) -> bool {
        self.missing.get(i).copied().unwrap_or(false)
    }
    /// Number of nodes flagged missing
    pub fn missing_count(&self) -> usize {
        self.missing.iter().filter(|m| **m).count()
    }
    /// Node positions
    pub fn positions(&self) -> &[SVector<f64, N>] {
        &self.position
    }
    /// Node velocities, in block units
    pub fn velocities(&self) -> &[SVector<f64, N>] {
        &self.velocity
    }
    /// Missing flags
    pub fn missing(&self) -> &[bool] {
        &self.missing
    }
    /// Mutable node positions, for the solver to update in place
    pub fn positions_mut(&mut self) -> &mut [SVector<f64, N>] {
        &mut self.position
    }
    /// Mutable node velocities (block units), for the solver to update in place
    pub fn velocities_mut(&mut self) -> &mut [SVector<f64, N>] {
        &mut self.velocity
    }
    /// Recovers missing nodes using the configured [crate::prelude::FillMethod]
    pub fn fill(&mut self) {
        let linear = self.cfg.fill.is_linear();
        self.fill_missing(linear);
    }
}
