//! Progress publishing port
//!
//! Defines the capability an evaluation pass uses to report live progress.

use quizbench_domain::ProgressEvent;

/// Fire-and-forget sink for progress events
///
/// Implementations live in the presentation and infrastructure layers
/// (console output, broadcast channels, event logs). `publish` must not
/// block and must not fail, whether or not anyone is listening.
pub trait ProgressPublisher: Send + Sync {
    fn publish(&self, event: &ProgressEvent);
}

/// No-op publisher for when progress reporting is not needed
pub struct NoProgress;

impl ProgressPublisher for NoProgress {
    fn publish(&self, _event: &ProgressEvent) {}
}
