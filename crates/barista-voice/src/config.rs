use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SIGNALING_ADDRESS: &str = "https://app.viam.com:443";
pub const DEFAULT_SPEECH_RESOURCE: &str = "speechio";

fn default_signaling_address() -> String {
    DEFAULT_SIGNALING_ADDRESS.to_string()
}

fn default_speech_resource() -> String {
    DEFAULT_SPEECH_RESOURCE.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_speak_timeout_secs() -> u64 {
    30
}

/// Connection settings for the speech-capable device.
///
/// Empty credentials are allowed at load time; they surface as a
/// `ConnectionError::MissingCredentials` on the first handshake.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device address, either a bare host name or a full `https://` URL.
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_signaling_address")]
    pub signaling_address: String,
    #[serde(default)]
    pub api_key_id: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Name of the speech capability bound on the device.
    #[serde(default = "default_speech_resource")]
    pub speech_resource: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_speak_timeout_secs")]
    pub speak_timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            signaling_address: default_signaling_address(),
            api_key_id: String::new(),
            api_key: String::new(),
            speech_resource: default_speech_resource(),
            connect_timeout_secs: default_connect_timeout_secs(),
            speak_timeout_secs: default_speak_timeout_secs(),
        }
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("host", &self.host)
            .field("signaling_address", &self.signaling_address)
            .field("api_key_id", &self.api_key_id)
            .field("api_key", &"[REDACTED]")
            .field("speech_resource", &self.speech_resource)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("speak_timeout_secs", &self.speak_timeout_secs)
            .finish()
    }
}

impl DeviceConfig {
    pub fn new(
        host: impl Into<String>,
        api_key_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            api_key_id: api_key_id.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Returns the names of required fields that are still empty.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host");
        }
        if self.api_key_id.trim().is_empty() {
            missing.push("api_key_id");
        }
        if self.api_key.trim().is_empty() {
            missing.push("api_key");
        }
        missing
    }

    /// Handshake bound. Zero is raised to one second.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Per-phrase speak bound. Zero is raised to one second.
    pub fn speak_timeout(&self) -> Duration {
        Duration::from_secs(self.speak_timeout_secs.max(1))
    }

    /// Base URL of the device itself. Bare host names are reached over HTTPS.
    pub fn device_base_url(&self) -> String {
        base_url(&self.host)
    }

    pub fn signaling_base_url(&self) -> String {
        base_url(&self.signaling_address)
    }
}

fn base_url(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("https://{}", address)
    }
}
