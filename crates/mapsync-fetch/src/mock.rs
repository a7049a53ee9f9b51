//! Scripted [`HttpClient`] for tests of anything built on the fetcher.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;

use crate::http::{HttpClient, HttpResponse};

#[derive(Clone, Debug)]
enum Route {
    Body(Bytes),
    Status(u16),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError(pub String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl std::error::Error for MockError {}

/// In-memory client answering from a URL → response table.
///
/// Unknown URLs answer 404. Every request is recorded so tests can assert on
/// network traffic.
pub struct MockHttpClient {
    routes:     HashMap<String, Route>,
    requests:   Mutex<Vec<String>>,
    chunk_size: usize,
    latency:    Option<Duration>,
    delays:     HashMap<String, Duration>,
}

impl Default for MockHttpClient {
    fn default() -> Self { Self::new() }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> { m.lock().unwrap_or_else(PoisonError::into_inner) }

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            routes:     HashMap::new(),
            requests:   Mutex::new(Vec::new()),
            chunk_size: 64 * 1024,
            latency:    None,
            delays:     HashMap::new(),
        }
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.routes.insert(url.into(), Route::Body(body.into()));
        self
    }

    pub fn with_json(self, url: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with_body(url, value.to_string())
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.routes.insert(url.into(), Route::Status(status));
        self
    }

    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.routes.insert(url.into(), Route::Failure(message.into()));
        self
    }

    /// Body chunk size handed to the consumer.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Delay applied before every response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Extra delay before answering `url`, on top of any latency.
    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> { lock(&self.requests).clone() }

    pub fn request_count(&self) -> usize { lock(&self.requests).len() }

    pub fn hits(&self, url: &str) -> usize { lock(&self.requests).iter().filter(|u| *u == url).count() }
}

impl HttpClient for MockHttpClient {
    type Error = MockError;

    async fn get(&self, url: &str) -> Result<HttpResponse<Self::Error>, Self::Error> {
        lock(&self.requests).push(url.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }

        let (status, body) = match self.routes.get(url).cloned() {
            Some(Route::Body(body)) => (200, body),
            Some(Route::Status(status)) => (status, Bytes::new()),
            Some(Route::Failure(message)) => return Err(MockError(message)),
            None => (404, Bytes::new()),
        };

        let chunks: Vec<Result<Bytes, MockError>> = body
            .chunks(self.chunk_size)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(HttpResponse {
            status,
            body: Box::pin(futures_util::stream::iter(chunks)),
        })
    }
}
