use thiserror::Error;

/// Device handshake failures.
///
/// `Clone` so a single handshake outcome can be handed to every caller that
/// was waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("device credentials are not configured (missing: {0})")]
    MissingCredentials(String),

    #[error("failed to open device session: {0}")]
    Transport(String),

    #[error("device rejected credentials: {0}")]
    Rejected(String),

    #[error("failed to bind speech capability '{resource}': {reason}")]
    Capability { resource: String, reason: String },

    #[error("device handshake timed out after {0} seconds")]
    Timeout(u64),
}

/// Failures of a single announcement.
#[derive(Error, Debug)]
pub enum AnnouncementError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("speak call failed: {0}")]
    Speak(String),

    #[error("speak call timed out after {0} seconds")]
    Timeout(u64),
}
