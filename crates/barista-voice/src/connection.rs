//! Lazily established, process-wide device connection.
//!
//! State machine:
//!
//! ```text
//! Uninitialized --acquire--> Connecting --ok--> Ready
//!                                |
//!                                +--err--> Failed --acquire--> Connecting
//! ```
//!
//! While `Connecting`, every caller awaits the same shared handshake future
//! and observes its single outcome. Failures are not cached: the next
//! `acquire()` after a failure starts a fresh handshake. There is no backoff
//! and no circuit breaker, so every order after a failed handshake pays for a
//! new attempt.

use crate::device::{DeviceConnector, DeviceHandle};
use crate::error::ConnectionError;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

type HandshakeResult = Result<Arc<DeviceHandle>, ConnectionError>;
type Handshake = Shared<BoxFuture<'static, HandshakeResult>>;

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
    Failed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

enum Slot {
    Uninitialized,
    Connecting(Handshake),
    Ready(Arc<DeviceHandle>),
    Failed(ConnectionError),
}

/// Owns the single [`DeviceHandle`] for the process.
///
/// The slot lock is a `std::sync::Mutex` held only for brief state reads and
/// transitions, never across an `.await`.
pub struct ConnectionManager {
    connector: Arc<dyn DeviceConnector>,
    connect_timeout: Duration,
    slot: Arc<Mutex<Slot>>,
    attempts: Arc<AtomicU64>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn DeviceConnector>, connect_timeout: Duration) -> Self {
        Self {
            connector,
            connect_timeout,
            slot: Arc::new(Mutex::new(Slot::Uninitialized)),
            attempts: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the ready handle, performing the handshake if needed.
    ///
    /// A cached handle is returned without suspending. Concurrent callers
    /// during a handshake share its outcome.
    pub async fn acquire(&self) -> Result<Arc<DeviceHandle>, ConnectionError> {
        let handshake = {
            let mut slot = lock(&self.slot);
            match &*slot {
                Slot::Ready(handle) => return Ok(Arc::clone(handle)),
                Slot::Connecting(handshake) => handshake.clone(),
                Slot::Uninitialized | Slot::Failed(_) => {
                    let handshake = self.start_handshake();
                    *slot = Slot::Connecting(handshake.clone());
                    handshake
                }
            }
        };
        handshake.await
    }

    pub fn state(&self) -> ConnectionState {
        match &*lock(&self.slot) {
            Slot::Uninitialized => ConnectionState::Uninitialized,
            Slot::Connecting(_) => ConnectionState::Connecting,
            Slot::Ready(_) => ConnectionState::Ready,
            Slot::Failed(_) => ConnectionState::Failed,
        }
    }

    /// Error from the most recent handshake, if it failed.
    pub fn last_error(&self) -> Option<ConnectionError> {
        match &*lock(&self.slot) {
            Slot::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Number of handshakes started since the manager was created.
    pub fn handshake_count(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Builds the shared handshake future. The future itself records the
    /// outcome in the slot, so the transition happens exactly once no matter
    /// how many callers await it.
    fn start_handshake(&self) -> Handshake {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let connector = Arc::clone(&self.connector);
        let slot = Arc::clone(&self.slot);
        let timeout = self.connect_timeout;

        async move {
            info!(attempt, "starting device handshake");
            let started = Instant::now();

            // A panicking connector must still leave the slot retryable.
            let connect = AssertUnwindSafe(connector.connect()).catch_unwind();
            let result = match tokio::time::timeout(timeout, connect).await {
                Ok(Ok(Ok(device))) => Ok(Arc::new(DeviceHandle::new(device, attempt))),
                Ok(Ok(Err(e))) => Err(e),
                Ok(Err(_)) => Err(ConnectionError::Transport(
                    "device handshake panicked".to_string(),
                )),
                Err(_) => Err(ConnectionError::Timeout(timeout.as_secs())),
            };

            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            {
                let mut guard = lock(&slot);
                match &result {
                    Ok(handle) => {
                        info!(attempt, elapsed_ms, "device connection ready");
                        *guard = Slot::Ready(Arc::clone(handle));
                    }
                    Err(e) => {
                        warn!(attempt, elapsed_ms, error = %e, "device handshake failed");
                        *guard = Slot::Failed(e.clone());
                    }
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("handshakes", &self.handshake_count())
            .finish()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
