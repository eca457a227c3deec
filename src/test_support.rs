//! Scripted [`Transport`] for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::ZendeskError;
use crate::transport::{QueryParams, Transport};

/// One call the code under test made.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub params: QueryParams,
    pub body: Option<Value>,
}

/// Replays queued responses per `(method, path)` and records every call.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<HashMap<(&'static str, String), VecDeque<Result<Value, ZendeskError>>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Queues a successful response.
    pub fn respond(self, method: &'static str, path: &str, body: Value) -> Self {
        self.push(method, path, Ok(body));
        self
    }

    /// Queues a successful GET response.
    pub fn on_get(self, path: &str, body: Value) -> Self {
        self.respond("GET", path, body)
    }

    /// Queues an HTTP error for a GET.
    pub fn fail_on_get(self, path: &str, status: u16) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(
            "GET",
            path,
            Err(ZendeskError::from_status(status, "scripted failure".into(), None)),
        );
        self
    }

    /// Delays every response for `path`.
    pub fn delay(self, path: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
        self
    }

    fn push(&self, method: &'static str, path: &str, response: Result<Value, ZendeskError>) {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.path == path)
            .collect()
    }

    async fn dispatch(
        &self,
        method: &'static str,
        path: &str,
        params: &QueryParams,
        body: Option<&Value>,
    ) -> Result<Value, ZendeskError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            params: params.clone(),
            body: body.cloned(),
        });

        let delay = self.delays.lock().unwrap().get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);

        next.unwrap_or_else(|| {
            Err(ZendeskError::from_status(
                StatusCode::NOT_FOUND,
                format!("no scripted response for {} {}", method, path),
                None,
            ))
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        path: &str,
        params: &QueryParams,
        _max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError> {
        self.dispatch("GET", path, params, None).await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        _max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError> {
        self.dispatch("POST", path, &QueryParams::new(), body).await
    }

    async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        _max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError> {
        self.dispatch("PUT", path, &QueryParams::new(), body).await
    }

    async fn delete(
        &self,
        path: &str,
        body: Option<&Value>,
        _max_retries: Option<u32>,
    ) -> Result<Option<Value>, ZendeskError> {
        self.dispatch("DELETE", path, &QueryParams::new(), body)
            .await
            .map(|value| (!value.is_null()).then_some(value))
    }
}
