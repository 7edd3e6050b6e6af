use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::credentials::{Credential, CredentialSource};
use crate::error::{MoltbookError, Result};
use crate::transport::{RawResponse, Request, Transport};

/// Records every request and replays queued responses (default `200 {}`).
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<Request>>,
    responses: Mutex<VecDeque<RawResponse>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(RawResponse {
                status,
                body: body.to_string(),
            });
        self
    }

    pub(crate) fn calls(&self) -> Vec<Request> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: Request) -> Result<RawResponse> {
        self.calls.lock().expect("calls lock").push(request);
        let next = self.responses.lock().expect("responses lock").pop_front();
        Ok(next.unwrap_or(RawResponse {
            status: 200,
            body: "{}".to_string(),
        }))
    }
}

pub(crate) struct FailingCredentials;

impl CredentialSource for FailingCredentials {
    fn resolve(&self) -> Result<Credential> {
        Err(MoltbookError::NoCredential {
            message: "no API key found".to_string(),
        })
    }
}
