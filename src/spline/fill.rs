//! Missing node recovery
use itertools::Itertools;
use log::{debug, warn};
use nalgebra::SVector;
use polyfit_rs::polyfit_rs::polyfit;

use super::TrajectorySpline;

/// Observed nodes used on each side of a gap by the quadratic fit
const QUADRATIC_ANCHORS_PER_SIDE: usize = 2;

impl<const N: usize> TrajectorySpline<N> {
    /// Synthesizes position and velocity of every node flagged missing,
    /// from observed nodes only. Missing flags are left untouched so clamp
    /// constraints may later be attached to the recovered nodes.
    ///
    /// - interior gaps: straight line between the nearest observed node on
    ///   each side when `linear` is set, least squares quadratic through up to
    ///   two observed nodes on each side otherwise.
    /// - leading and trailing gaps: constant velocity extrapolation from the
    ///   nearest observed node.
    ///
    /// Nodes are left untouched when no node was observed at all.
    /// Since only observed nodes are read, calling this twice is harmless.
    pub fn fill_missing(&mut self, linear: bool) {
        let anchors = self.missing.iter().positions(|missing| !missing).collect::<Vec<_>>();
        if anchors.is_empty() {
            if !self.missing.is_empty() {
                warn!("fill_missing: no observed node, {} nodes left as is", self.nodes());
            }
            return;
        }
        for i in 0..self.nodes() {
            if !self.missing[i] {
                continue;
            }
            let k = anchors.partition_point(|a| *a < i);
            let before = k.checked_sub(1).map(|k| anchors[k]);
            let after = anchors.get(k).copied();
            let (r, v) = match (before, after) {
                (Some(a), Some(b)) => {
                    if linear {
                        self.linear_fill(i, a, b)
                    } else {
                        let lo = k.saturating_sub(QUADRATIC_ANCHORS_PER_SIDE);
                        let hi = (k + QUADRATIC_ANCHORS_PER_SIDE).min(anchors.len());
                        self.quadratic_fill(i, &anchors[lo..hi])
                            .unwrap_or_else(|| self.linear_fill(i, a, b))
                    }
                },
                (Some(a), None) | (None, Some(a)) => self.extrapolate(i, a),
                (None, None) => continue,
            };
            debug!(
                "node #{} recovered from {:?}/{:?} ({})",
                i,
                before,
                after,
                if linear { "linear" } else { "quadratic" }
            );
            self.position[i] = r;
            self.velocity[i] = v;
        }
    }
    /// Straight line between observed nodes `a` < `i` < `b`
    fn linear_fill(&self, i: usize, a: usize, b: usize) -> (SVector<f64, N>, SVector<f64, N>) {
        let w = (i - a) as f64 / (b - a) as f64;
        (
            self.position[a] * (1.0 - w) + self.position[b] * w,
            self.velocity[a] * (1.0 - w) + self.velocity[b] * w,
        )
    }
    /// Constant velocity motion from observed node `a`
    fn extrapolate(&self, i: usize, a: usize) -> (SVector<f64, N>, SVector<f64, N>) {
        let dt = i as f64 - a as f64;
        (self.position[a] + self.velocity[a] * dt, self.velocity[a])
    }
    /// Least squares quadratic (in node index) through `anchors`, fitted
    /// separately on each position and velocity component.
    /// None when fewer than three anchors are available or the fit fails.
    fn quadratic_fill(
        &self,
        i: usize,
        anchors: &[usize],
    ) -> Option<(SVector<f64, N>, SVector<f64, N>)> {
        if anchors.len() < 3 {
            warn!("node #{}: only {} anchors, using linear fit", i, anchors.len());
            return None;
        }
        let x = anchors
            .iter()
            .map(|a| *a as f64 - i as f64)
            .collect::<Vec<_>>();

        let mut r = SVector::<f64, N>::zeros();
        let mut v = SVector::<f64, N>::zeros();
        for k in 0..N {
            let r_k = anchors.iter().map(|a| self.position[*a][k]).collect::<Vec<_>>();
            let v_k = anchors.iter().map(|a| self.velocity[*a][k]).collect::<Vec<_>>();
            // x is centered on the missing node: the constant term is the estimate
            r[k] = Self::fit_at_origin(&x, &r_k, i)?;
            v[k] = Self::fit_at_origin(&x, &v_k, i)?;
        }
        Some((r, v))
    }
    fn fit_at_origin(x: &[f64], y: &[f64], i: usize) -> Option<f64> {
        match polyfit(x, y, 2) {
            Ok(coefs) => coefs.first().copied(),
            Err(e) => {
                warn!("node #{}: quadratic fit failed ({}), using linear fit", i, e);
                None
            },
        }
    }
}
