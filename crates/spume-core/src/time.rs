//! The time interval covered by one simulation step.

use std::fmt;

/// Start time and duration of one simulation step.
///
/// Passed by the stepper into per-step update logic so forces and other
/// time-dependent effects can be scaled by [`duration`](Self::duration),
/// and so events inside the step can be placed with
/// [`interpolate`](Self::interpolate).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimeSpan {
    start: f32,
    duration: f32,
}

impl TimeSpan {
    /// Create a span starting at `start` and lasting `duration`.
    pub fn new(start: f32, duration: f32) -> Self {
        Self { start, duration }
    }

    /// Start of the step.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Length of the step.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// End of the step: `start + duration`.
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Map a step-relative factor to an absolute time: `start + t * duration`.
    ///
    /// Not clamped: `t` outside `[0, 1]` extrapolates. Callers that need a
    /// time inside the step clamp `t` themselves.
    pub fn interpolate(&self, t: f32) -> f32 {
        self.start + t * self.duration
    }

    /// Split into `n` consecutive sub-spans of equal duration.
    ///
    /// The sub-spans are contiguous and together cover `self`. `n == 0`
    /// yields nothing.
    pub fn split(&self, n: u32) -> impl Iterator<Item = TimeSpan> + '_ {
        let step = if n == 0 {
            0.0
        } else {
            self.duration / n as f32
        };
        (0..n).map(move |i| {
            let start = self.interpolate(i as f32 / n as f32);
            TimeSpan::new(start, step)
        })
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
