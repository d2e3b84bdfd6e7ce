use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Missing node recovery method
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FillMethod {
    /// Straight line between the nearest observed nodes on each side
    #[default]
    Linear,
    /// Least squares quadratic through up to two observed nodes
    /// on each side of the gap. Falls back to [FillMethod::Linear]
    /// when fewer than three observed nodes are available.
    Quadratic,
}

impl FillMethod {
    /// True when this is the straight line fill
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }
}

impl std::fmt::Display for FillMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
        }
    }
}

impl std::str::FromStr for FillMethod {
    type Err = Error;
    fn from_str(s: &str) -> Result<FillMethod, Error> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "linear" => Ok(FillMethod::Linear),
            "quadratic" | "quad" => Ok(FillMethod::Quadratic),
            _ => Err(Error::UnknownFillMethod(c.to_string())),
        }
    }
}

/// Time partition of a [crate::prelude::TrajectorySpline]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of segments (blocks). The spline holds one more node.
    pub segments: usize,
    /// Block duration, must be strictly positive
    pub tblock: f64,
    /// Start time of the first block
    pub tstart: f64,
    /// Missing node recovery method
    pub fill: FillMethod,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segments: 1,
            tblock: 1.0,
            tstart: 0.0,
            fill: FillMethod::default(),
        }
    }
}

impl Config {
    /// Builds a new [Config] covering `segments` blocks of `tblock` starting at `tstart`
    pub fn new(segments: usize, tblock: f64, tstart: f64) -> Self {
        Self {
            segments,
            tblock,
            tstart,
            ..Default::default()
        }
    }
    /// Copies and returns [Config] with updated segment count
    pub fn with_segments(&self, segments: usize) -> Self {
        let mut s = self.clone();
        s.segments = segments;
        s
    }
    /// Copies and returns [Config] with updated block duration
    pub fn with_tblock(&self, tblock: f64) -> Self {
        let mut s = self.clone();
        s.tblock = tblock;
        s
    }
    /// Copies and returns [Config] with updated start time
    pub fn with_tstart(&self, tstart: f64) -> Self {
        let mut s = self.clone();
        s.tstart = tstart;
        s
    }
    /// Copies and returns [Config] with updated [FillMethod]
    pub fn with_fill(&self, fill: FillMethod) -> Self {
        let mut s = self.clone();
        s.fill = fill;
        s
    }
    /// Duration covered by all blocks
    pub fn span(&self) -> f64 {
        self.segments as f64 * self.tblock
    }
    /// End time of the last block
    pub fn end(&self) -> f64 {
        self.tstart + self.span()
    }
    /// Verifies this partition may back a spline
    /// Number of nodes (segments + 1)
    pub(crate) fn nodes(&self) -> Result<usize, Error> {
        self.segments
            .checked_add(1)
            .ok_or(Error::TooManySegments(self.segments))
    }
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.segments == 0 {
            return Err(Error::NoSegments);
        }
        self.nodes()?;
        if !(self.tblock.is_finite() && self.tblock > 0.0) {
            return Err(Error::NonPositiveBlock(self.tblock));
        }
        if !self.tstart.is_finite() {
            return Err(Error::NonFiniteStart(self.tstart));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Config, FillMethod};
    use crate::Error;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("linear", FillMethod::Linear)]
    #[case(" Linear ", FillMethod::Linear)]
    #[case("QUADRATIC", FillMethod::Quadratic)]
    #[case("quad", FillMethod::Quadratic)]
    fn fill_method_parsing(#[case] desc: &str, #[case] expected: FillMethod) {
        let method = FillMethod::from_str(desc).unwrap();
        assert_eq!(method, expected);
        assert_eq!(FillMethod::from_str(&method.to_string()).unwrap(), method);
    }

    #[test]
    fn unknown_fill_method() {
        match FillMethod::from_str("cubic") {
            Err(Error::UnknownFillMethod(s)) => assert_eq!(s, "cubic"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[rstest]
    #[case(Config::new(0, 1.0, 0.0), false)]
    #[case(Config::new(usize::MAX, 1.0, 0.0), false)]
    #[case(Config::new(4, 0.0, 0.0), false)]
    #[case(Config::new(4, -1.0, 0.0), false)]
    #[case(Config::new(4, f64::NAN, 0.0), false)]
    #[case(Config::new(4, 1.0, f64::INFINITY), false)]
    #[case(Config::new(4, 0.5, -10.0), true)]
    #[case(Config::default(), true)]
    fn validation(#[case] cfg: Config, #[case] valid: bool) {
        assert_eq!(cfg.validate().is_ok(), valid, "{:?}", cfg);
    }

    #[test]
    fn node_count_overflow() {
        match Config::new(usize::MAX, 1.0, 0.0).validate() {
            Err(Error::TooManySegments(n)) => assert_eq!(n, usize::MAX),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(Config::new(usize::MAX - 1, 1.0, 0.0).nodes().unwrap(), usize::MAX);
    }

    #[test]
    fn builder() {
        let cfg = Config::default()
            .with_segments(10)
            .with_tblock(0.5)
            .with_tstart(100.0)
            .with_fill(FillMethod::Quadratic);
        assert_eq!(cfg.segments, 10);
        assert_eq!(cfg.span(), 5.0);
        assert_eq!(cfg.end(), 105.0);
        assert!(!cfg.fill.is_linear());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize() {
        let cfg: Config =
            serde_json::from_str(r#"{"segments": 8, "tblock": 0.25, "fill": "quadratic"}"#)
                .unwrap();
        assert_eq!(cfg.segments, 8);
        assert_eq!(cfg.tblock, 0.25);
        assert_eq!(cfg.tstart, 0.0);
        assert_eq!(cfg.fill, FillMethod::Quadratic);
    }
}
