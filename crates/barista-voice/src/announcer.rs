//! Best-effort order announcements.
//!
//! Orders hand announcements to a bounded queue and move on. A single
//! background worker drains the queue, acquires the device connection and
//! speaks one phrase at a time, so the device never sees overlapping calls.
//! Outcomes are logged and broadcast to subscribers; they never flow back to
//! the order that dispatched them.

use crate::connection::ConnectionManager;
use crate::error::AnnouncementError;
use barista_types::{order_ready_phrase, AnnouncementOutcome};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

/// Default capacity of the outcome broadcast channel.
const DEFAULT_OUTCOME_BROADCAST_CAPACITY: usize = 64;

/// A queued announcement.
#[derive(Debug, Clone)]
pub struct Announcement {
    pub order_id: Uuid,
    pub phrase: String,
}

/// Handle for dispatching announcements to the background worker.
#[derive(Debug, Clone)]
pub struct Announcer {
    queue: mpsc::Sender<Announcement>,
    outcomes: broadcast::Sender<AnnouncementOutcome>,
}

impl Announcer {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// The worker runs until every `Announcer` clone is dropped.
    pub fn spawn(
        connections: Arc<ConnectionManager>,
        queue_capacity: usize,
        speak_timeout: Duration,
    ) -> Self {
        let (queue, rx) = mpsc::channel(queue_capacity.max(1));
        let (outcomes, _) = broadcast::channel(DEFAULT_OUTCOME_BROADCAST_CAPACITY);

        tokio::spawn(run_worker(
            connections,
            rx,
            outcomes.clone(),
            speak_timeout,
        ));

        Self { queue, outcomes }
    }

    /// Queues an announcement for `pronunciation` without waiting.
    ///
    /// Returns `false` when the announcement was dropped because the queue is
    /// full or the worker has stopped.
    pub fn dispatch(&self, order_id: Uuid, pronunciation: &str) -> bool {
        let announcement = Announcement {
            order_id,
            phrase: order_ready_phrase(pronunciation),
        };

        match self.queue.try_send(announcement) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(order_id = %dropped.order_id, "announcement queue full, dropping announcement");
                false
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                warn!(order_id = %dropped.order_id, "announcement worker stopped, dropping announcement");
                false
            }
        }
    }

    /// Subscribes to announcement outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<AnnouncementOutcome> {
        self.outcomes.subscribe()
    }
}

async fn run_worker(
    connections: Arc<ConnectionManager>,
    mut rx: mpsc::Receiver<Announcement>,
    outcomes: broadcast::Sender<AnnouncementOutcome>,
    speak_timeout: Duration,
) {
    info!("announcement worker started");

    while let Some(announcement) = rx.recv().await {
        let Announcement { order_id, phrase } = announcement;

        let outcome = match announce(&connections, &phrase, speak_timeout).await {
            Ok(()) => {
                info!(%order_id, phrase = %phrase, "order announced");
                AnnouncementOutcome::spoken(order_id, phrase)
            }
            Err(e) => {
                warn!(%order_id, error = %e, "order announcement failed");
                AnnouncementOutcome::failed(order_id, phrase, e.to_string())
            }
        };

        // No subscribers is the normal case outside of tests.
        let _ = outcomes.send(outcome);
    }

    info!("announcement worker stopped");
}

/// Acquires the device and speaks `phrase`, waiting for playback to finish.
pub async fn announce(
    connections: &ConnectionManager,
    phrase: &str,
    speak_timeout: Duration,
) -> Result<(), AnnouncementError> {
    let handle = connections.acquire().await?;
    let speak = AssertUnwindSafe(handle.speak(phrase, true)).catch_unwind();
    match tokio::time::timeout(speak_timeout, speak).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(AnnouncementError::Speak("speak call panicked".to_string())),
        Err(_) => Err(AnnouncementError::Timeout(speak_timeout.as_secs())),
    }
}
