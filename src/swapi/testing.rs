//! In-memory `Fetch` implementation for tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{ApiError, Fetch};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(u16),
}

/// Serves canned replies per URL, optionally after a delay, and records calls
#[derive(Debug, Default)]
pub(crate) struct FakeFetch {
    replies: HashMap<String, (Reply, Duration)>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_json(mut self, url: &str, body: Value) -> Self {
        self.replies
            .insert(url.to_string(), (Reply::Json(body), Duration::ZERO));
        self
    }

    pub(crate) fn with_delayed_json(mut self, url: &str, body: Value, delay_ms: u64) -> Self {
        self.replies.insert(
            url.to_string(),
            (Reply::Json(body), Duration::from_millis(delay_ms)),
        );
        self
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies
            .insert(url.to_string(), (Reply::Status(status), Duration::ZERO));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }

        // Unknown URLs behave like a missing resource
        let (reply, delay) = self
            .replies
            .get(url)
            .cloned()
            .unwrap_or((Reply::Status(404), Duration::ZERO));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Json(body) => Ok(body),
            Reply::Status(status) => Err(ApiError::Status {
                status,
                url: url.to_string(),
            }),
        }
    }
}
