//! JSON-over-HTTPS transport for the speech device.
//!
//! Handshake:
//! 1. `POST {signaling}/v1/session` with the credential triple, returning a
//!    session token for the device host.
//! 2. `POST {device}/v1/resources/{resource}/bind` with that token, binding
//!    the named speech capability.
//!
//! Speaking is `POST {device}/v1/resources/{resource}/say`.

use crate::config::DeviceConfig;
use crate::device::{DeviceConnector, SpeechDevice};
use crate::error::{AnnouncementError, ConnectionError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    host: &'a str,
    credentials: Credentials<'a>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    payload: &'a str,
    auth_entity: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_token: String,
}

#[derive(Debug, Serialize)]
struct SayRequest<'a> {
    text: &'a str,
    blocking: bool,
}

/// Connects to the device with the credentials in [`DeviceConfig`].
#[derive(Debug, Clone)]
pub struct HttpDeviceConnector {
    client: reqwest::Client,
    config: DeviceConfig,
}

impl HttpDeviceConnector {
    pub fn new(config: DeviceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.speak_timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }

    async fn open_session(&self) -> Result<String, ConnectionError> {
        let url = format!("{}/v1/session", self.config.signaling_base_url());
        let body = SessionRequest {
            host: &self.config.host,
            credentials: Credentials {
                kind: "api-key",
                payload: &self.config.api_key,
                auth_entity: &self.config.api_key_id,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ConnectionError::Rejected(format!(
                    "signaling server returned {}",
                    response.status()
                )))
            }
            status if !status.is_success() => {
                return Err(ConnectionError::Transport(format!(
                    "signaling server returned {}",
                    status
                )))
            }
            _ => {}
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| ConnectionError::Transport(format!("invalid session response: {}", e)))?;
        Ok(session.session_token)
    }

    async fn bind_capability(&self, token: &str) -> Result<String, ConnectionError> {
        let resource_url = format!(
            "{}/v1/resources/{}",
            self.config.device_base_url(),
            self.config.speech_resource
        );
        let capability_error = |reason: String| ConnectionError::Capability {
            resource: self.config.speech_resource.clone(),
            reason,
        };

        let response = self
            .client
            .post(format!("{}/bind", resource_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ConnectionError::Rejected(
                format!("device returned {}", response.status()),
            )),
            StatusCode::NOT_FOUND => Err(capability_error("resource not found on device".into())),
            status if !status.is_success() => {
                Err(capability_error(format!("device returned {}", status)))
            }
            _ => Ok(resource_url),
        }
    }
}

#[async_trait]
impl DeviceConnector for HttpDeviceConnector {
    async fn connect(&self) -> Result<Box<dyn SpeechDevice>, ConnectionError> {
        let missing = self.config.missing_credentials();
        if !missing.is_empty() {
            return Err(ConnectionError::MissingCredentials(missing.join(", ")));
        }

        let token = self.open_session().await?;
        debug!(host = %self.config.host, "device session opened");

        let resource_url = self.bind_capability(&token).await?;
        debug!(resource = %self.config.speech_resource, "speech capability bound");

        Ok(Box::new(HttpSpeechDevice {
            client: self.client.clone(),
            say_url: format!("{}/say", resource_url),
            token,
        }))
    }
}

/// A bound speech capability reached over HTTPS.
struct HttpSpeechDevice {
    client: reqwest::Client,
    say_url: String,
    token: String,
}

#[async_trait]
impl SpeechDevice for HttpSpeechDevice {
    async fn speak(&self, text: &str, blocking: bool) -> Result<(), AnnouncementError> {
        let response = self
            .client
            .post(&self.say_url)
            .bearer_auth(&self.token)
            .json(&SayRequest { text, blocking })
            .send()
            .await
            .map_err(|e| AnnouncementError::Speak(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AnnouncementError::Speak(format!(
                "device returned {}: {}",
                status, detail
            )));
        }
        Ok(())
    }
}
