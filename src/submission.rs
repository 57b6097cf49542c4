//! Offer submission
//!
//! Submitting the final step is the only asynchronous point of the wizard.
//! The work runs on a background thread and reports back over a channel that
//! the event loop polls, so the UI keeps drawing ("Processing...") meanwhile.
//!
//! There is no server: [`SimulatedSubmitter`] waits for a fixed delay and
//! succeeds. The [`OfferSubmitter`] trait is the seam for anything else.
//!
//! # Failure Modes
//!
//! - Submitter returns an error: reported as a failed submission
//! - Submitter thread panics: its channel closes, also reported as failed
//!
//! Either way the caller shows one static message and the user may resubmit.
//! Nothing is retried automatically.

use crate::error::{LeadFormError, Result};
use crate::session::FormSession;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Something that can take a completed session and request offers for it.
pub trait OfferSubmitter: Send + Sync {
    /// Submit the lead. Blocks until the submission finished.
    fn submit(&self, session: &FormSession) -> Result<()>;
}

/// Stand-in for a real backend: sleeps, then accepts.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl OfferSubmitter for SimulatedSubmitter {
    fn submit(&self, session: &FormSession) -> Result<()> {
        debug!(
            "Simulating offer submission for budget {} ({:?} delay)",
            session.budget(),
            self.delay
        );
        thread::sleep(self.delay);
        Ok(())
    }
}

/// Runs one submission at a time off the calling thread.
pub struct SubmissionWorker {
    submitter: Arc<dyn OfferSubmitter>,
    /// Receiver of the in-flight submission, if any
    in_flight: Option<Receiver<Result<()>>>,
}

impl SubmissionWorker {
    pub fn new(submitter: Arc<dyn OfferSubmitter>) -> Self {
        Self {
            submitter,
            in_flight: None,
        }
    }

    /// True while a submission has been started and not yet reported.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start submitting `session`.
    ///
    /// Returns `false` without doing anything if a submission is already in
    /// flight.
    pub fn start(&mut self, session: FormSession) -> bool {
        if self.is_pending() {
            debug!("Submission already in flight, ignoring");
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let submitter = Arc::clone(&self.submitter);

        thread::spawn(move || {
            let result = submitter.submit(&session);
            // Receiver dropped means nobody cares any more
            let _ = tx.send(result);
        });

        info!("Offer submission started");
        self.in_flight = Some(rx);
        true
    }

    /// Non-blocking check for the outcome of the in-flight submission.
    ///
    /// Returns `None` while still running (or when nothing was started).
    pub fn poll(&mut self) -> Option<Result<()>> {
        let outcome = match self.in_flight.as_ref()?.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LeadFormError::submission(
                "submission worker stopped without reporting",
            )),
        };

        self.in_flight = None;
        match &outcome {
            Ok(()) => info!("Offer submission accepted"),
            Err(e) => warn!("Offer submission failed: {}", e),
        }
        Some(outcome)
    }

    /// Block until the in-flight submission reports, up to `timeout`.
    pub fn wait(&mut self, timeout: Duration) -> Option<Result<()>> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(outcome) = self.poll() {
                return Some(outcome);
            }
            if !self.is_pending() || std::time::Instant::now() >= deadline {
                return None;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSubmitter;

    impl OfferSubmitter for FailingSubmitter {
        fn submit(&self, _session: &FormSession) -> Result<()> {
            Err(LeadFormError::submission("backend unavailable"))
        }
    }

    struct PanickingSubmitter;

    impl OfferSubmitter for PanickingSubmitter {
        fn submit(&self, _session: &FormSession) -> Result<()> {
            panic!("submitter crashed");
        }
    }

    #[test]
    fn test_simulated_submission_succeeds() {
        let mut worker = SubmissionWorker::new(Arc::new(SimulatedSubmitter::new(Duration::ZERO)));
        assert!(worker.start(FormSession::default()));
        let outcome = worker.wait(Duration::from_secs(5)).expect("should report");
        assert!(outcome.is_ok());
        assert!(!worker.is_pending());
    }

    #[test]
    fn test_second_start_is_ignored_while_pending() {
        let mut worker =
            SubmissionWorker::new(Arc::new(SimulatedSubmitter::new(Duration::from_millis(200))));
        assert!(worker.start(FormSession::default()));
        assert!(!worker.start(FormSession::default()));
        assert!(worker.is_pending());
        assert!(worker.wait(Duration::from_secs(5)).is_some());
    }

    #[test]
    fn test_poll_without_submission() {
        let mut worker = SubmissionWorker::new(Arc::new(SimulatedSubmitter::new(Duration::ZERO)));
        assert!(worker.poll().is_none());
        assert!(worker.wait(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_submitter_error_is_reported() {
        let mut worker = SubmissionWorker::new(Arc::new(FailingSubmitter));
        worker.start(FormSession::default());
        let outcome = worker.wait(Duration::from_secs(5)).expect("should report");
        assert!(matches!(outcome, Err(LeadFormError::Submission(_))));
    }

    #[test]
    fn test_panicking_submitter_is_reported_as_failure() {
        let mut worker = SubmissionWorker::new(Arc::new(PanickingSubmitter));
        worker.start(FormSession::default());
        let outcome = worker.wait(Duration::from_secs(5)).expect("should report");
        assert!(outcome.is_err());
        // Worker is usable again
        assert!(!worker.is_pending());
    }
}
