/// Admits frames no closer together than `min_interval` seconds.
///
/// A timestamp that moves backwards (e.g. a restarted clock) is admitted and
/// becomes the new reference point.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    min_interval: f64,
    last_admitted: Option<f64>,
}

/// Tolerance for timestamps that land a hair before the interval boundary.
const EPSILON: f64 = 1e-6;

impl FrameThrottle {
    pub fn new(min_interval: f64) -> Self {
        Self {
            min_interval: min_interval.max(0.0),
            last_admitted: None,
        }
    }

    pub fn admit(&mut self, timestamp: f64) -> bool {
        let admitted = match self.last_admitted {
            None => true,
            Some(last) if timestamp < last => true,
            Some(last) => timestamp - last + EPSILON >= self.min_interval,
        };
        if admitted {
            self.last_admitted = Some(timestamp);
        }
        admitted
    }

    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}
