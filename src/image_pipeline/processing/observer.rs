//! Lifecycle signalling.
//!
//! Observer methods are called from whichever thread runs the job, never from
//! the submitting context, so implementations must be thread-safe.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

pub trait ProcessingObserver: Send + Sync {
    fn on_started(&self);
    fn on_completed(&self);
    fn on_failed(&self, reason: &str);
}

/// Lifecycle signal of one run. `Started` comes first, then exactly one terminal signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Started,
    Completed,
    Failed(String),
}

impl ProcessingOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessingOutcome::Started)
    }
}

/// Observer that forwards signals as messages over a channel.
///
/// Clones share state, so only the first terminal signal sent through any of
/// them is delivered.
#[derive(Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<ProcessingOutcome>,
    terminated: Arc<AtomicBool>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::UnboundedSender<ProcessingOutcome>) -> Self {
        Self {
            sender,
            terminated: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    fn finish(&self, outcome: ProcessingOutcome) {
        if !self.terminated.swap(true, Ordering::SeqCst) {
            // The receiver may already be gone if the caller dropped its handle.
            let _ = self.sender.send(outcome);
        }
    }
}

impl ProcessingObserver for ChannelObserver {
    fn on_started(&self) {
        if !self.is_terminated() {
            let _ = self.sender.send(ProcessingOutcome::Started);
        }
    }

    fn on_completed(&self) {
        self.finish(ProcessingOutcome::Completed);
    }

    fn on_failed(&self, reason: &str) {
        self.finish(ProcessingOutcome::Failed(reason.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_terminal_signal_is_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let observer = ChannelObserver::new(tx);
        let other = observer.clone();

        observer.on_started();
        observer.on_completed();
        other.on_failed("late");

        assert_eq!(rx.try_recv().unwrap(), ProcessingOutcome::Started);
        assert_eq!(rx.try_recv().unwrap(), ProcessingOutcome::Completed);
        assert!(rx.try_recv().is_err());
        assert!(other.is_terminated());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let observer = ChannelObserver::new(tx);
        observer.on_started();
        observer.on_failed("nobody listening");
        assert!(observer.is_terminated());
    }
}
