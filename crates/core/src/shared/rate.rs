use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Instantaneous frames-per-second estimate from consecutive timestamps.
///
/// No smoothing: each update reports `1 / (t_now - t_prev)`. With no prior
/// timestamp the result is `NaN`; out-of-order or duplicate timestamps yield
/// the raw negative or infinite value.
#[derive(Clone, Debug)]
pub struct RateEstimator {
    last_timestamp: Option<f64>,
    fps: f64,
}

impl RateEstimator {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            fps: f64::NAN,
        }
    }

    pub fn update(&mut self, timestamp: f64) -> f64 {
        self.fps = match self.last_timestamp {
            Some(prev) => 1.0 / (timestamp - prev),
            None => f64::NAN,
        };
        self.last_timestamp = Some(timestamp);
        self.fps
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest rate value shared between the capture loop and the engine thread.
///
/// Diagnostic only; readers may observe a value one update stale.
#[derive(Clone, Debug)]
pub struct SharedRate(Arc<AtomicU64>);

impl SharedRate {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(f64::NAN.to_bits())))
    }

    pub fn publish(&self, fps: f64) {
        self.0.store(fps.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

impl Default for SharedRate {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an fps value as a truncated integer, or `--` when it is not finite.
pub fn format_fps(fps: f64) -> String {
    if fps.is_finite() {
        format!("{}", fps.trunc() as i64)
    } else {
        "--".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_first_update_is_not_usable() {
        let mut rate = RateEstimator::new();
        let fps = rate.update(0.5);
        assert!(!(fps.is_finite() && fps > 0.0));
        assert_eq!(rate.last_timestamp(), Some(0.5));
    }

    #[rstest]
    #[case::thirty_fps(1.0, 1.0 + 1.0 / 30.0, 30.0)]
    #[case::ten_fps(2.0, 2.1, 10.0)]
    #[case::slow(0.0, 4.0, 0.25)]
    fn test_reciprocal_of_delta(#[case] prev: f64, #[case] now: f64, #[case] expected: f64) {
        let mut rate = RateEstimator::new();
        rate.update(prev);
        assert_relative_eq!(rate.update(now), expected, epsilon = 1e-9);
        assert_relative_eq!(rate.fps(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_timestamp_is_infinite() {
        let mut rate = RateEstimator::new();
        rate.update(1.0);
        assert!(rate.update(1.0).is_infinite());
    }

    #[test]
    fn test_out_of_order_is_negative_and_still_advances() {
        let mut rate = RateEstimator::new();
        rate.update(2.0);
        assert!(rate.update(1.5) < 0.0);
        assert_eq!(rate.last_timestamp(), Some(1.5));
        assert_relative_eq!(rate.update(2.0), 2.0);
    }

    #[rstest]
    #[case(f64::NAN, "--")]
    #[case(f64::INFINITY, "--")]
    #[case(f64::NEG_INFINITY, "--")]
    #[case(29.97, "29")]
    #[case(-4.5, "-4")]
    fn test_format_fps(#[case] fps: f64, #[case] expected: &str) {
        assert_eq!(format_fps(fps), expected);
    }

    #[test]
    fn test_shared_rate_starts_nan_and_publishes() {
        let shared = SharedRate::new();
        assert!(shared.get().is_nan());
        let reader = shared.clone();
        shared.publish(24.0);
        assert_eq!(reader.get(), 24.0);
    }
}
