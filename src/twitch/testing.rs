use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::client::{RawResponse, TwitchApi};
use crate::error::TransportError;

type Scripted = Result<RawResponse, TransportError>;

/// In-memory `TwitchApi` replaying queued responses.
///
/// When the streams queue is empty, `accepted_token` decides the answer:
/// a matching bearer token gets `200 {"data": []}`, anything else `401`.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    streams: Mutex<VecDeque<Scripted>>,
    refreshes: Mutex<VecDeque<Scripted>>,
    accepted_token: Mutex<Option<String>>,
    refresh_delay: Option<Duration>,
    stream_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    pub seen_tokens: Mutex<Vec<String>>,
    pub seen_refresh_tokens: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = Some(delay);
        self
    }

    pub fn accept_token(self, token: &str) -> Self {
        *self.accepted_token.lock().unwrap() = Some(token.to_string());
        self
    }

    pub fn push_stream(&self, status: u16, body: impl Into<String>) {
        self.streams.lock().unwrap().push_back(Ok(raw(status, body)));
    }

    pub fn push_stream_json(&self, status: u16, body: Value) {
        self.push_stream(status, body.to_string());
    }

    pub fn push_stream_failure(&self, message: &str) {
        self.streams
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn push_refresh(&self, status: u16, body: impl Into<String>) {
        self.refreshes
            .lock()
            .unwrap()
            .push_back(Ok(raw(status, body)));
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

fn raw(status: u16, body: impl Into<String>) -> RawResponse {
    RawResponse::new(StatusCode::from_u16(status).unwrap(), body)
}

#[async_trait]
impl TwitchApi for ScriptedApi {
    async fn get_streams(
        &self,
        _user_login: &str,
        _client_id: &str,
        access_token: &str,
    ) -> Result<RawResponse, TransportError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens
            .lock()
            .unwrap()
            .push(access_token.to_string());

        if let Some(next) = self.streams.lock().unwrap().pop_front() {
            return next;
        }

        let accepted = self.accepted_token.lock().unwrap().clone();
        match accepted {
            Some(token) if token == access_token => Ok(raw(200, r#"{"data":[]}"#)),
            _ => Ok(raw(401, r#"{"error":"Unauthorized"}"#)),
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RawResponse, TransportError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_refresh_tokens
            .lock()
            .unwrap()
            .push(refresh_token.to_string());

        if let Some(delay) = self.refresh_delay {
            tokio::time::sleep(delay).await;
        }

        self.refreshes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted refresh".to_string())))
    }
}
