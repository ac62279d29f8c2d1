//! Test doubles for job tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::sender::{MessageSender, SendOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentMessage {
    pub recipient: String,
    pub text: String,
}

enum Behavior {
    Ok,
    Fail(String),
    PanicOn(String),
}

/// Sender that records every call and answers according to a fixed behavior.
pub(crate) struct RecordingSender {
    calls: Mutex<Vec<SentMessage>>,
    behavior: Behavior,
}

impl RecordingSender {
    fn with(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            behavior,
        })
    }

    pub fn ok() -> Arc<Self> {
        Self::with(Behavior::Ok)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with(Behavior::Fail(message.to_string()))
    }

    pub fn panicking_on(text: &str) -> Arc<Self> {
        Self::with(Behavior::PanicOn(text.to_string()))
    }

    /// Outcome returned by the `ok` behavior for `text`.
    pub fn ok_outcome(text: &str) -> SendOutcome {
        SendOutcome::Response {
            succeeded: true,
            status_code: 200,
            body: json!({ "echo": text }),
        }
    }

    pub fn calls(&self) -> Vec<SentMessage> {
        self.calls.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.text).collect()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, _credential: &str, recipient: &str, text: &str) -> SendOutcome {
        self.calls.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            text: text.to_string(),
        });

        match &self.behavior {
            Behavior::Ok => Self::ok_outcome(text),
            Behavior::Fail(message) => SendOutcome::error(message.clone()),
            Behavior::PanicOn(trigger) if trigger == text => panic!("sender blew up on {text}"),
            Behavior::PanicOn(_) => Self::ok_outcome(text),
        }
    }
}
