use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::constants::PARSE_FAILURE;
use crate::credentials::{Credential, CredentialSource};
use crate::error::{MoltbookError, Result};
use crate::transport::{Request, Transport};

/// Normalized outcome of one call that reached the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub status: u16,
    #[serde(skip)]
    malformed: bool,
}

impl Envelope {
    pub fn ok(status: u16, data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status,
            malformed: false,
        }
    }

    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status,
            malformed: false,
        }
    }

    fn parse_failure(status: u16) -> Self {
        Self {
            malformed: true,
            ..Self::failure(status, PARSE_FAILURE)
        }
    }

    /// Builds the envelope from a raw status and body.
    ///
    /// An empty body is read as JSON `null`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = if body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(body)
        };
        let Ok(parsed) = parsed else {
            return Self::parse_failure(status);
        };
        if (200..300).contains(&status) {
            Self::ok(status, parsed)
        } else {
            Self::failure(status, error_message(status, &parsed))
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    pub fn into_result(self) -> Result<Value> {
        if self.success {
            return Ok(self.data.unwrap_or(Value::Null));
        }
        if self.malformed {
            return Err(MoltbookError::MalformedResponse {
                status: self.status,
            });
        }
        Err(MoltbookError::Application {
            status: self.status,
            message: self.error.unwrap_or_default(),
        })
    }
}

fn error_message(status: u16, body: &Value) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(key))
        .find(|value| !value.is_null())
        .map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

/// Sends requests against one base URL with credentials from one source.
#[derive(Clone)]
pub struct Dispatcher {
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(
        base_url: &str,
        allow_insecure: bool,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        ensure_secure_addr(base_url, allow_insecure)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Envelope> {
        let credential = self.credentials.resolve()?;
        let mut url = format!("{}{}", self.base_url, path);
        append_params(&mut url, query);
        let body = body.map(serde_json::to_string).transpose().map_err(|err| {
            MoltbookError::validation(format!("request body is not serializable: {err}"))
        })?;
        let request = Request {
            method: method.clone(),
            url: url.clone(),
            headers: request_headers(&credential)?,
            body,
        };

        debug!(method = %method, url = %url, "http request");
        let start = Instant::now();
        let response = self.transport.execute(request).await?;
        debug!(
            method = %method,
            url = %url,
            status = response.status,
            elapsed_ms = start.elapsed().as_millis(),
            "http response"
        );

        let envelope = Envelope::from_response(response.status, &response.body);
        if !envelope.success {
            info!(
                method = %method,
                url = %url,
                status = response.status,
                error = envelope.error.as_deref().unwrap_or_default(),
                "request rejected"
            );
        }
        Ok(envelope)
    }
}

pub fn ensure_secure_addr(addr: &str, allow_insecure: bool) -> Result<()> {
    if addr.starts_with("http://") && !allow_insecure {
        return Err(MoltbookError::InsecureAddr {
            addr: addr.to_string(),
        });
    }
    Ok(())
}

fn request_headers(credential: &Credential) -> Result<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", credential.expose())).map_err(
        |_| MoltbookError::NoCredential {
            message: "API key contains characters that are not allowed in a header".to_string(),
        },
    )?;
    auth.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

pub(crate) fn append_params(url: &mut String, params: &[(String, String)]) {
    if params.is_empty() {
        return;
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<String>>()
        .join("&");
    url.push('?');
    url.push_str(&query);
}
