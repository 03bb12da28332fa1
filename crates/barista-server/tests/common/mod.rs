#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use barista_misspell::{parse_misspelling, GenerationError, MisspellGenerator};
use barista_server::AppState;
use barista_types::{MisspellRequest, MisspellResult};
use barista_voice::{
    AnnouncementError, Announcer, ConnectionError, ConnectionManager, DeviceConnector,
    SpeechDevice,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

pub const MUTT_REPLY: &str =
    r#"{"misspelled":"Mutt","pronunciation":"MUTT","chaos":"medium","strategy":"mishearing"}"#;

/// Generator that records every request and answers with a canned reply.
pub struct FakeGenerator {
    reply: Result<String, ()>,
    pub requests: Mutex<Vec<MisspellRequest>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A generator whose provider is unreachable.
    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl MisspellGenerator for FakeGenerator {
    async fn generate(&self, request: &MisspellRequest) -> Result<MisspellResult, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => parse_misspelling(text),
            Err(()) => Err(GenerationError::Request("connection refused".to_string())),
        }
    }
}

/// Speaker that remembers what it said.
#[derive(Default)]
pub struct Speaker {
    pub said: Mutex<Vec<String>>,
    hang: bool,
}

impl Speaker {
    /// A speaker whose `speak` never returns.
    pub fn hung() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl SpeechDevice for Speaker {
    async fn speak(&self, text: &str, _blocking: bool) -> Result<(), AnnouncementError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.said.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct SharedSpeaker(Arc<Speaker>);

#[async_trait]
impl SpeechDevice for SharedSpeaker {
    async fn speak(&self, text: &str, blocking: bool) -> Result<(), AnnouncementError> {
        self.0.speak(text, blocking).await
    }
}

/// Connector that always rejects, never finishes, or always hands out the
/// same speaker.
pub struct FakeConnector {
    speaker: Option<Arc<Speaker>>,
    hang: bool,
    pub calls: AtomicUsize,
}

impl FakeConnector {
    pub fn working(speaker: Arc<Speaker>) -> Arc<Self> {
        Arc::new(Self {
            speaker: Some(speaker),
            hang: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            speaker: None,
            hang: false,
            calls: AtomicUsize::new(0),
        })
    }

    /// A connector whose handshake never completes.
    pub fn hung() -> Arc<Self> {
        Arc::new(Self {
            speaker: None,
            hang: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DeviceConnector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn SpeechDevice>, ConnectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        match &self.speaker {
            Some(speaker) => Ok(Box::new(SharedSpeaker(Arc::clone(speaker)))),
            None => Err(ConnectionError::Rejected("invalid api key".to_string())),
        }
    }
}

pub fn build_state(
    generator: Arc<FakeGenerator>,
    connector: Arc<FakeConnector>,
) -> AppState {
    let connections = Arc::new(ConnectionManager::new(connector, Duration::from_secs(5)));
    let announcer = Announcer::spawn(connections.clone(), 8, Duration::from_secs(5));
    AppState {
        generator,
        connections,
        announcer,
    }
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
