// crates/vidsqueeze-core/src/progress.rs
//
// Progress is the playback clock divided by the probed duration.
//
// Policy: the sample never goes backwards within a session. A playback clock
// that reports an earlier time (stall, timestamp correction) or a non-finite
// time keeps the last reported value. Only `complete()` produces exactly 100
// after a capture finishes; `reset()` starts a new session at 0.

/// `elapsed / duration * 100`, clamped to [0, 100].
/// Unknown or non-positive durations yield 0.
///
/// ```
/// use vidsqueeze_core::progress::percentage;
/// assert_eq!(percentage(2.5, Some(10.0)), 25.0);
/// assert_eq!(percentage(12.0, Some(10.0)), 100.0);
/// assert_eq!(percentage(-1.0, Some(10.0)), 0.0);
/// assert_eq!(percentage(3.0, Some(0.0)), 0.0);
/// assert_eq!(percentage(3.0, None), 0.0);
/// ```
pub fn percentage(elapsed: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 && elapsed.is_finite() => {
            (elapsed / d * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressEstimator {
    last: f64,
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest sample in [0, 100].
    pub fn current(&self) -> f64 {
        self.last
    }

    /// Fold a playback clock reading into the sample and return it.
    pub fn sample(&mut self, elapsed: f64, duration: Option<f64>) -> f64 {
        if !elapsed.is_finite() {
            return self.last;
        }
        let p = percentage(elapsed, duration);
        if p > self.last {
            self.last = p;
        }
        self.last
    }

    /// Pin the sample to 100.
    pub fn complete(&mut self) -> f64 {
        self.last = 100.0;
        self.last
    }

    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_steps() {
        let mut p = ProgressEstimator::new();
        let got: Vec<f64> = [0.0, 2.5, 5.0, 7.5, 10.0]
            .iter()
            .map(|&t| p.sample(t, Some(10.0)))
            .collect();
        assert_eq!(got, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn regressions_hold_last_value() {
        let mut p = ProgressEstimator::new();
        assert_eq!(p.sample(6.0, Some(10.0)), 60.0);
        assert_eq!(p.sample(4.0, Some(10.0)), 60.0);
        assert_eq!(p.sample(f64::NAN, Some(10.0)), 60.0);
        assert_eq!(p.sample(7.0, Some(10.0)), 70.0);
    }

    #[test]
    fn zero_duration_is_zero() {
        let mut p = ProgressEstimator::new();
        assert_eq!(p.sample(5.0, Some(0.0)), 0.0);
        assert_eq!(p.sample(5.0, None), 0.0);
    }

    #[test]
    fn complete_pins_and_reset_restarts() {
        let mut p = ProgressEstimator::new();
        p.sample(3.0, Some(10.0));
        assert_eq!(p.complete(), 100.0);
        p.reset();
        assert_eq!(p.current(), 0.0);
    }
}
