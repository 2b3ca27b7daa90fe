//! Progress reporting: the sink interface and the worker-owned counters

use std::path::Path;

/// Observer interface the worker reports progress through.
///
/// The worker calls these synchronously at each update point; implementations
/// should be quick and must not block. Each counter's minimum and maximum are
/// fixed when the worker is constructed (see
/// [`ProgressConfig`](crate::config::ProgressConfig)); only the current value
/// is delivered here.
pub trait ProgressSink: Send + Sync {
    /// The overall counter moved (one unit per item).
    fn overall_progress(&self, current: u32);

    /// The partial counter moved (one unit per asset within the current item).
    fn partial_progress(&self, current: u32);

    /// Human-readable label for what is currently downloading (once per item).
    fn now_downloading(&self, label: &str);

    /// Where output is being saved (once at run start).
    fn save_location(&self, path: &Path);
}

/// Sink that discards every update.
///
/// For embedders that only consume the structured event stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn overall_progress(&self, _current: u32) {}
    fn partial_progress(&self, _current: u32) {}
    fn now_downloading(&self, _label: &str) {}
    fn save_location(&self, _path: &Path) {}
}

/// Sink that mirrors every update into the tracing log at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn overall_progress(&self, current: u32) {
        tracing::debug!(current, "overall progress");
    }

    fn partial_progress(&self, current: u32) {
        tracing::debug!(current, "partial progress");
    }

    fn now_downloading(&self, label: &str) {
        tracing::info!(label, "downloading");
    }

    fn save_location(&self, path: &Path) {
        tracing::info!(path = %path.display(), "saving to");
    }
}

/// One worker-owned `(current, min, max)` progress triple.
///
/// The worker is the only writer. Stepping follows
/// `current = min + (max - min) / total_steps * step`, truncated — the same
/// arithmetic for both counters, so partial and overall progress stay
/// comparable across sinks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProgressCounter {
    min: u32,
    max: u32,
    current: u32,
}

impl ProgressCounter {
    pub(crate) fn new(bounds: crate::config::CounterBounds) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
            current: bounds.min,
        }
    }

    pub(crate) fn current(&self) -> u32 {
        self.current
    }

    /// Reset to the minimum (partial counter, at the start of each item).
    pub(crate) fn reset(&mut self) {
        self.current = self.min;
    }

    /// Position the counter at `step` of `total_steps`.
    ///
    /// A zero `total_steps` leaves the counter untouched; the caller signals
    /// completion separately via [`complete`](Self::complete).
    pub(crate) fn set_step(&mut self, step: u32, total_steps: u32) {
        if total_steps == 0 {
            return;
        }
        let increment = f64::from(self.max - self.min) / f64::from(total_steps);
        self.current = self.min + (increment * f64::from(step)) as u32;
    }

    /// Snap to the maximum (item or run completion).
    pub(crate) fn complete(&mut self) {
        self.current = self.max;
    }
}
