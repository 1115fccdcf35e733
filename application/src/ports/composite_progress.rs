//! Composite progress publisher that fans events out to several publishers.
//!
//! Used to drive the console reporter, the live broadcast channel and the
//! JSONL event log from a single pass.

use super::progress::ProgressPublisher;
use quizbench_domain::ProgressEvent;

/// A publisher that forwards every event to each delegate in order.
///
/// Holds borrowed publishers so both owned and borrowed sinks can be
/// composed without wrapper types.
pub struct CompositePublisher<'a> {
    delegates: Vec<&'a dyn ProgressPublisher>,
}

impl<'a> CompositePublisher<'a> {
    pub fn new(delegates: Vec<&'a dyn ProgressPublisher>) -> Self {
        Self { delegates }
    }

    /// Add another delegate
    pub fn with(mut self, delegate: &'a dyn ProgressPublisher) -> Self {
        self.delegates.push(delegate);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl ProgressPublisher for CompositePublisher<'_> {
    fn publish(&self, event: &ProgressEvent) {
        for d in &self.delegates {
            d.publish(event);
        }
    }
}
