//! Test utilities shared by the unit tests
//!
//! Provides a scripted [`Provider`] so the driver and subscription layers can be
//! exercised without a broker, a recording [`PlotBackend`], and a helper for
//! writing lines files to a temporary location.

#![cfg(test)]

use std::collections::VecDeque;
use std::io::Write;

use tempfile::NamedTempFile;
use tokio::sync::mpsc;

use crate::plot::PlotBackend;
use crate::provider::{Provider, ProviderEvent};
use crate::types::{ConnectionStatus, MessagePacket, SegmentSeries};
use crate::{Result, ScopeError};

enum Step {
    Event(ProviderEvent),
    Error(String),
}

/// Provider that replays a fixed list of events, then ends (or hangs).
pub struct ScriptedProvider {
    topic: String,
    steps: VecDeque<Step>,
    pending_forever: bool,
}

impl ScriptedProvider {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into(), steps: VecDeque::new(), pending_forever: false }
    }

    pub fn status(mut self, status: ConnectionStatus) -> Self {
        self.steps.push_back(Step::Event(ProviderEvent::Status(status)));
        self
    }

    pub fn message(mut self, payload: impl Into<Vec<u8>>) -> Self {
        let packet = MessagePacket::new(self.topic.as_str(), payload.into(), 0);
        self.steps.push_back(Step::Event(ProviderEvent::Message(packet)));
        self
    }

    pub fn error(mut self, reason: impl Into<String>) -> Self {
        self.steps.push_back(Step::Error(reason.into()));
        self
    }

    /// Never end after the script runs out, like a quiet broker
    pub fn pending_forever(mut self) -> Self {
        self.pending_forever = true;
        self
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    async fn next_event(&mut self) -> Result<Option<ProviderEvent>> {
        match self.steps.pop_front() {
            Some(Step::Event(event)) => Ok(Some(event)),
            Some(Step::Error(reason)) => Err(ScopeError::connection_failed(reason)),
            None if self.pending_forever => std::future::pending().await,
            None => Ok(None),
        }
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

/// Provider fed by the test while the subscription runs; ends when the sender drops.
pub struct ChannelProvider {
    topic: String,
    events: mpsc::UnboundedReceiver<ProviderEvent>,
}

impl ChannelProvider {
    pub fn new(topic: impl Into<String>) -> (mpsc::UnboundedSender<ProviderEvent>, Self) {
        let (tx, events) = mpsc::unbounded_channel();
        (tx, Self { topic: topic.into(), events })
    }

    /// Message event carrying `payload` on this provider's topic
    pub fn message(&self, payload: impl Into<Vec<u8>>) -> ProviderEvent {
        ProviderEvent::Message(MessagePacket::new(self.topic.as_str(), payload.into(), 0))
    }
}

#[async_trait::async_trait]
impl Provider for ChannelProvider {
    async fn next_event(&mut self) -> Result<Option<ProviderEvent>> {
        Ok(self.events.recv().await)
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

/// Backend that keeps every series it was asked to render.
#[derive(Default)]
pub struct RecordingBackend {
    pub rendered: Vec<SegmentSeries>,
}

impl PlotBackend for RecordingBackend {
    fn render(&mut self, series: &SegmentSeries) -> Result<()> {
        self.rendered.push(series.clone());
        Ok(())
    }
}

/// Write `json` to a temporary file that lives as long as the returned handle.
pub fn write_lines_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp lines file");
    file.write_all(json.as_bytes()).expect("write temp lines file");
    file.flush().expect("flush temp lines file");
    file
}
