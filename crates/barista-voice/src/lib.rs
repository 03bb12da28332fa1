//! Speech-device connection and order announcements.
//!
//! The kiosk keeps one session to an external speech-capable device for the
//! lifetime of the process. [`ConnectionManager`] establishes it lazily and
//! coalesces concurrent handshakes; [`Announcer`] queues spoken
//! announcements so that a slow or broken device never touches the order
//! response path.

pub mod announcer;
pub mod config;
pub mod connection;
pub mod device;
pub mod error;
pub mod http;

pub use announcer::{announce, Announcement, Announcer};
pub use config::{DeviceConfig, DEFAULT_SIGNALING_ADDRESS, DEFAULT_SPEECH_RESOURCE};
pub use connection::{ConnectionManager, ConnectionState};
pub use device::{DeviceConnector, DeviceHandle, SpeechDevice};
pub use error::{AnnouncementError, ConnectionError};
pub use http::HttpDeviceConnector;
