//! Scriptable device doubles shared by the voice integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use barista_voice::{AnnouncementError, ConnectionError, DeviceConnector, SpeechDevice};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Records every phrase and the peak number of overlapping `speak` calls.
#[derive(Default)]
pub struct RecordingDevice {
    pub spoken: Mutex<Vec<(String, bool)>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub fail_speak: bool,
    panic_next: AtomicBool,
}

impl RecordingDevice {
    pub fn failing() -> Self {
        Self {
            fail_speak: true,
            ..Self::default()
        }
    }

    /// Panics inside its first `speak` call, then behaves normally.
    pub fn panicking_once() -> Self {
        Self {
            panic_next: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn phrases(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }
}

#[async_trait]
impl SpeechDevice for RecordingDevice {
    async fn speak(&self, text: &str, blocking: bool) -> Result<(), AnnouncementError> {
        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("speaker driver crashed");
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_speak {
            return Err(AnnouncementError::Speak("speaker unplugged".to_string()));
        }
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), blocking));
        Ok(())
    }
}

/// Hands a shared [`RecordingDevice`] to the connection manager.
struct SharedDevice(Arc<RecordingDevice>);

#[async_trait]
impl SpeechDevice for SharedDevice {
    async fn speak(&self, text: &str, blocking: bool) -> Result<(), AnnouncementError> {
        self.0.speak(text, blocking).await
    }
}

/// Connector whose handshakes wait on a gate and then succeed or fail
/// according to a script. Once the script runs out, handshakes succeed.
pub struct ScriptedConnector {
    pub calls: AtomicUsize,
    script: Mutex<VecDeque<Result<(), ConnectionError>>>,
    gate: watch::Receiver<bool>,
    pub device: Arc<RecordingDevice>,
}

impl ScriptedConnector {
    /// Returns the connector and the sender that opens its gate.
    pub fn gated(
        script: Vec<Result<(), ConnectionError>>,
        device: Arc<RecordingDevice>,
    ) -> (Arc<Self>, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let connector = Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
            gate: rx,
            device,
        });
        (connector, tx)
    }

    /// A connector with its gate already open.
    pub fn open(
        script: Vec<Result<(), ConnectionError>>,
        device: Arc<RecordingDevice>,
    ) -> Arc<Self> {
        let (connector, tx) = Self::gated(script, device);
        tx.send(true).unwrap();
        connector
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceConnector for ScriptedConnector {
    async fn connect(&self) -> Result<Box<dyn SpeechDevice>, ConnectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut gate = self.gate.clone();
        gate.wait_for(|open| *open)
            .await
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;

        let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        next.map(|()| Box::new(SharedDevice(Arc::clone(&self.device))) as Box<dyn SpeechDevice>)
    }
}

/// Connector whose first handshake panics. Later handshakes succeed.
pub struct PanickingConnector {
    calls: AtomicUsize,
    pub device: Arc<RecordingDevice>,
}

impl PanickingConnector {
    pub fn new(device: Arc<RecordingDevice>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            device,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceConnector for PanickingConnector {
    async fn connect(&self) -> Result<Box<dyn SpeechDevice>, ConnectionError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("transport driver crashed");
        }
        Ok(Box::new(SharedDevice(Arc::clone(&self.device))))
    }
}

pub fn rejected() -> ConnectionError {
    ConnectionError::Rejected("bad api key".to_string())
}
