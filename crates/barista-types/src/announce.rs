//! Announcement outcome records.
//!
//! An [`AnnouncementOutcome`] is never part of the customer-facing response.
//! It exists so operators (and tests) can observe whether a spoken
//! announcement actually happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Renders the phrase spoken by the device for a finished order.
pub fn order_ready_phrase(pronunciation: &str) -> String {
    format!("Order ready for {}", pronunciation)
}

/// Result of one best-effort announcement attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementOutcome {
    /// Order the announcement belongs to.
    pub order_id: Uuid,
    /// The exact phrase that was (or would have been) spoken.
    pub phrase: String,
    pub success: bool,
    /// Error message when `success` is false.
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl AnnouncementOutcome {
    pub fn spoken(order_id: Uuid, phrase: String) -> Self {
        Self {
            order_id,
            phrase,
            success: true,
            error: None,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(order_id: Uuid, phrase: String, error: impl Into<String>) -> Self {
        Self {
            order_id,
            phrase,
            success: false,
            error: Some(error.into()),
            finished_at: Utc::now(),
        }
    }
}
