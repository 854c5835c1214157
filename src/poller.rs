//! Background refresh of a subject's measurements.
//!
//! The poller owns a worker thread that sleeps for an initial delay, then
//! fetches on a fixed period until cancelled. Results travel to the UI thread
//! over an `mpsc` channel and are drained in `update`, the same way page loads
//! are. Failed fetches and payloads that are not a list of records are logged
//! and skipped; the schedule never stops because of them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{measurement_records, ApiError};
use crate::viewport::{normalize, MeasurementPoint};

/// Source of raw measurement payloads for one subject
pub trait MeasurementFeed: Send + 'static {
    fn fetch(&self) -> Result<Value, ApiError>;
}

impl<F> MeasurementFeed for F
where
    F: Fn() -> Result<Value, ApiError> + Send + 'static,
{
    fn fetch(&self) -> Result<Value, ApiError> {
        self()
    }
}

/// Callback used to wake the UI after a message was posted
pub type Repaint = Arc<dyn Fn() + Send + Sync>;

/// Timing of the refresh loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSchedule {
    pub initial_delay: Duration,
    pub period: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            period: Duration::from_millis(5000),
        }
    }
}

impl PollSchedule {
    pub fn from_millis(initial_delay_ms: u64, period_ms: u64) -> Self {
        Self {
            initial_delay: Duration::from_millis(initial_delay_ms),
            period: Duration::from_millis(period_ms.max(1)),
        }
    }
}

/// Messages posted by the worker
#[derive(Debug, Clone)]
pub enum PollMessage {
    /// A freshly normalized canonical sequence
    Fetched(Vec<MeasurementPoint>),
    /// A fetch failed; already logged by the worker
    Failed(String),
}

/// Shared cancellation flag, checked by the worker after each fetch and by
/// the UI before committing anything it received
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a running refresh loop. Dropping it cancels the loop.
pub struct RefreshPoller {
    token: CancelToken,
    /// Dropping the sender wakes the worker out of its sleep
    wake: Option<Sender<()>>,
    receiver: Receiver<PollMessage>,
}

impl RefreshPoller {
    /// Start polling `feed` on `schedule`
    pub fn spawn<F: MeasurementFeed>(feed: F, schedule: PollSchedule, repaint: Repaint) -> Self {
        let token = CancelToken::default();
        let (wake_tx, wake_rx) = channel::<()>();
        let (sender, receiver) = channel();

        let worker_token = token.clone();
        thread::spawn(move || {
            run_loop(feed, schedule, worker_token, wake_rx, sender, repaint);
        });

        Self {
            token,
            wake: Some(wake_tx),
            receiver,
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop the loop. Messages still queued are discarded.
    pub fn cancel(&mut self) {
        if !self.token.is_cancelled() {
            debug!("Cancelling refresh poller");
        }
        self.token.cancel();
        self.wake = None;
    }

    /// Drain pending messages and return the most recent fetched sequence.
    /// Returns nothing once cancelled.
    pub fn latest(&self) -> Option<Vec<MeasurementPoint>> {
        let mut latest = None;
        while let Ok(message) = self.receiver.try_recv() {
            if self.token.is_cancelled() {
                return None;
            }
            match message {
                PollMessage::Fetched(points) => latest = Some(points),
                PollMessage::Failed(reason) => debug!("Skipping failed poll: {}", reason),
            }
        }
        latest
    }

    /// Next raw message, if any
    pub fn try_recv(&self) -> Option<PollMessage> {
        if self.token.is_cancelled() {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    /// Block until the next message or `timeout` elapses
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PollMessage> {
        if self.token.is_cancelled() {
            return None;
        }
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl Drop for RefreshPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_loop<F: MeasurementFeed>(
    feed: F,
    schedule: PollSchedule,
    token: CancelToken,
    wake: Receiver<()>,
    sender: Sender<PollMessage>,
    repaint: Repaint,
) {
    info!(
        "Refresh poller started (delay {:?}, period {:?})",
        schedule.initial_delay, schedule.period
    );
    let mut wait = schedule.initial_delay;

    loop {
        match wake.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            // Any wake-up or a dropped handle means stop
            _ => break,
        }
        if token.is_cancelled() {
            break;
        }

        // Only a list of records counts as a successful poll
        let message = match feed.fetch().and_then(measurement_records) {
            Ok(payload) => PollMessage::Fetched(normalize(&payload)),
            Err(e) => {
                warn!("Measurement poll failed: {}", e);
                PollMessage::Failed(e.to_string())
            }
        };

        if token.is_cancelled() || sender.send(message).is_err() {
            break;
        }
        repaint();
        wait = schedule.period;
    }

    info!("Refresh poller stopped");
}
