//! In-crate test doubles for the ports.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::significant_drop_tightening)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use warden_domain::{HttpRequest, HttpResponse, TokenRecord};

use crate::ports::{HttpClient, HttpClientError, StorageError, TokenStorage};

/// Token slot kept in memory.
#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<TokenRecord>>,
}

impl MemoryStorage {
    pub fn with_token(token: TokenRecord) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
        }
    }

    pub fn current(&self) -> Option<TokenRecord> {
        self.slot.lock().expect("Lock poisoned").clone()
    }
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<TokenRecord>, StorageError> {
        Ok(self.current())
    }

    async fn save(&self, token: &TokenRecord) -> Result<(), StorageError> {
        *self.slot.lock().expect("Lock poisoned") = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().expect("Lock poisoned") = None;
        Ok(())
    }
}

/// Token slot that can be read but rejects every write.
pub struct FailingStorage {
    token: Option<TokenRecord>,
}

impl FailingStorage {
    pub const fn with_token(token: TokenRecord) -> Self {
        Self { token: Some(token) }
    }
}

#[async_trait]
impl TokenStorage for FailingStorage {
    async fn load(&self) -> Result<Option<TokenRecord>, StorageError> {
        Ok(self.token.clone())
    }

    async fn save(&self, _: &TokenRecord) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".to_string()))
    }
}

/// Transport that answers from a queue and records what it was sent.
#[derive(Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpClientError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses
            .lock()
            .expect("Lock poisoned")
            .push_back(Ok(response));
        self
    }

    pub fn fail(self, error: HttpClientError) -> Self {
        self.responses
            .lock()
            .expect("Lock poisoned")
            .push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("Lock poisoned").clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("no request was sent")
    }
}

impl HttpClient for ScriptedHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        self.requests.lock().expect("Lock poisoned").push(request);
        self.responses
            .lock()
            .expect("Lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }
}

impl HttpClient for std::sync::Arc<ScriptedHttpClient> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        self.as_ref().send(request).await
    }
}

/// Parses a form body back into ordered pairs.
pub fn form_pairs(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
