//! In-memory transport double for orchestrator tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::backend::{BackendError, OutboundRequest, RawReply, Transport};

enum Scripted {
    Reply(RawReply),
    Fail(String),
}

/// Replays queued replies in order and records every request it sees
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<OutboundRequest>>,
    delay: Option<Duration>,
    gated: bool,
    request_seen: Notify,
    gate: Notify,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Hold every request until `release` is called
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn reply(&self, reply: RawReply) {
        self.script.lock().unwrap().push_back(Scripted::Reply(reply));
    }

    pub fn fail(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub async fn wait_for_request(&self) {
        self.request_seen.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawReply, BackendError> {
        self.requests.lock().unwrap().push(request);
        self.request_seen.notify_one();

        if self.gated {
            self.gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(BackendError::Status(message)),
            None => Err(BackendError::Status("no scripted reply".to_string())),
        }
    }
}
