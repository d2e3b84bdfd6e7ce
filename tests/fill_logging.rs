//! Log records emitted by missing node recovery.
//! Runs in its own process, so installing a global logger is safe here.
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;
use trajectory_spline::prelude::*;

struct Capture(Mutex<Vec<(Level, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }
    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.0.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }
    fn flush(&self) {}
}

static LOGGER: Capture = Capture(Mutex::new(Vec::new()));

#[test]
fn quadratic_fallback_is_a_warning() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    // two observed nodes around the gap: a quadratic is not defined
    let cfg = Config::new(2, 1.0, 0.0).with_fill(FillMethod::Quadratic);
    let mut spline = TrajectorySpline::<1>::new(cfg).unwrap();
    for i in 0..spline.nodes() {
        let t = spline.node_time(i);
        let (r, v) = (SVector::<f64, 1>::new(t * t), SVector::<f64, 1>::new(2.0 * t));
        spline.set_node(i, r, v, i == 1).unwrap();
    }
    spline.fill();
    // linear fallback: halfway between nodes 0 and 2
    assert_eq!(spline.positions()[1][0], 2.0);

    let records = LOGGER.0.lock().unwrap();
    let fallback = records
        .iter()
        .find(|(_, msg)| msg.contains("using linear fit"))
        .expect("fallback was not reported");
    assert_eq!(fallback.0, Level::Warn, "{:?}", fallback);
}
