//! Progress reporting for long-running decodes.

/// Receives completion percentages from a running decode.
///
/// A sink is called with values in `0..=100`. Returning `false` asks the
/// decoder to stop; it then fails with
/// [`DecodeError::Cancelled`](crate::DecodeError::Cancelled) instead of
/// producing a result.
pub trait ProgressSink {
    /// Report the current completion percentage.
    ///
    /// Returns `true` to continue decoding, `false` to cancel.
    fn progress(&mut self, percent: u8) -> bool;
}

impl<F: FnMut(u8) -> bool> ProgressSink for F {
    fn progress(&mut self, percent: u8) -> bool {
        self(percent)
    }
}

/// A sink that ignores all progress reports.
///
/// # Example
///
/// ```
/// use stl_decode::{Discard, ProgressSink};
///
/// let mut sink = Discard;
/// assert!(sink.progress(50));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl ProgressSink for Discard {
    fn progress(&mut self, _percent: u8) -> bool {
        true
    }
}

/// Tracks the last percentage delivered to a sink.
///
/// Values are clamped to 100; repeated or regressing values are dropped
/// without reaching the sink. This makes the delivered sequence strictly
/// increasing regardless of how the decoder estimates progress.
#[derive(Debug, Clone, Default)]
pub struct ProgressMeter {
    last: Option<u8>,
}

impl ProgressMeter {
    /// Create a meter that has delivered nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Deliver `percent` to `sink` unless it repeats or regresses.
    ///
    /// Returns `false` only when the sink itself requested cancellation.
    pub fn update(&mut self, percent: u8, sink: &mut dyn ProgressSink) -> bool {
        let percent = percent.min(100);
        match self.last {
            Some(last) if percent <= last => true,
            _ => {
                self.last = Some(percent);
                sink.progress(percent)
            }
        }
    }
}
