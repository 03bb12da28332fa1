//! Device abstractions.
//!
//! A [`DeviceConnector`] performs the handshake and yields a
//! [`SpeechDevice`]. The [`ConnectionManager`](crate::ConnectionManager)
//! wraps that device in a [`DeviceHandle`] and is its only owner.

use crate::error::{AnnouncementError, ConnectionError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// A bound speech capability on the remote device.
///
/// Implementations must tolerate concurrent `speak` calls; the
/// [`Announcer`](crate::Announcer) serializes them anyway.
#[async_trait]
pub trait SpeechDevice: Send + Sync {
    /// Speaks `text`. With `blocking` set, returns only after playback ends.
    async fn speak(&self, text: &str, blocking: bool) -> Result<(), AnnouncementError>;
}

/// Opens a session to the device, authenticates, and binds the speech
/// capability.
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn SpeechDevice>, ConnectionError>;
}

/// The process-wide session to the speech device.
///
/// Not `Clone`: callers share it through the `Arc` handed out by
/// [`ConnectionManager::acquire`](crate::ConnectionManager::acquire).
pub struct DeviceHandle {
    device: Box<dyn SpeechDevice>,
    attempt: u64,
    connected_at: DateTime<Utc>,
}

impl DeviceHandle {
    pub(crate) fn new(device: Box<dyn SpeechDevice>, attempt: u64) -> Self {
        Self {
            device,
            attempt,
            connected_at: Utc::now(),
        }
    }

    /// Handshake attempt number that produced this handle (1-based).
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    pub async fn speak(&self, text: &str, blocking: bool) -> Result<(), AnnouncementError> {
        self.device.speak(text, blocking).await
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("attempt", &self.attempt)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}
