//! HTTP client for stored procedures and edge functions.

use crate::error::{BackendError, Result};
use keel_core::{BackendConfig, Session};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Build a standard HTTP client with the configured timeout.
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| BackendError::Internal(format!("failed to create HTTP client: {e}")))
}

/// Client for the hosted backend.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: String,
    bearer: Option<String>,
}

impl BackendClient {
    /// Create an anonymous client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            bearer: None,
        })
    }

    /// Attach the session's access token to subsequent calls.
    ///
    /// # Errors
    /// Returns `BackendError::Session` if the session holds no token.
    pub fn with_session(mut self, session: &Session) -> Result<Self> {
        self.bearer = Some(session.bearer()?);
        Ok(self)
    }

    /// Whether calls carry a user token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer.is_some()
    }

    /// URL of a stored procedure.
    #[must_use]
    pub fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{name}", self.base_url)
    }

    /// URL of an edge function.
    #[must_use]
    pub fn function_url(&self, function: &str) -> String {
        format!("{}/functions/v1/{function}", self.base_url)
    }

    fn authorization(&self) -> String {
        self.bearer
            .clone()
            .unwrap_or_else(|| format!("Bearer {}", self.anon_key))
    }

    /// Call a stored procedure and decode its JSON result.
    pub async fn rpc<P, T>(&self, name: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("rpc {}", name);
        let response = self
            .client
            .post(self.rpc_url(name))
            .header("apikey", &self.anon_key)
            .header("Authorization", self.authorization())
            .header("Content-Type", "application/json")
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = parse_api_error(status.as_u16(), &text);
            tracing::warn!("rpc {} failed: {}", name, err);
            return Err(err);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Invoke an edge function, keeping response headers for the caller.
    pub async fn invoke<B>(&self, function: &str, body: &B) -> Result<FunctionResponse>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("invoke {}", function);
        let response = self
            .client
            .post(self.function_url(function))
            .header("apikey", &self.anon_key)
            .header("Authorization", self.authorization())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let text = response.text().await?;

        if !status.is_success() {
            let err = parse_api_error(status.as_u16(), &text);
            tracing::warn!("invoke {} failed: {}", function, err);
            return Err(err);
        }

        FunctionResponse::from_parts(status.as_u16(), headers, &text)
    }
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

/// Response of an edge function call.
#[derive(Debug, Clone)]
pub struct FunctionResponse {
    /// HTTP status code
    pub status: u16,
    headers: HashMap<String, String>,
    /// Decoded JSON body (`Null` for an empty body)
    pub body: serde_json::Value,
}

impl FunctionResponse {
    /// Assemble a response from raw parts.
    ///
    /// Header names are matched case-insensitively.
    pub fn from_parts(status: u16, headers: HashMap<String, String>, body: &str) -> Result<Self> {
        let body = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(body)?
        };
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Look up a response header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Decode the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.body)?)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

/// Turn a failed response body into a `BackendError::Api`.
///
/// Bodies of the shape `{ "code": ..., "error" | "message": ... }` keep their
/// code; anything else becomes the message verbatim.
#[must_use]
pub fn parse_api_error(status: u16, text: &str) -> BackendError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => BackendError::Api {
            status,
            code: body.code,
            message: body
                .error
                .or(body.message)
                .unwrap_or_else(|| format!("request failed with status {status}")),
        },
        Err(_) => BackendError::Api {
            status,
            code: None,
            message: if text.is_empty() {
                format!("request failed with status {status}")
            } else {
                text.to_string()
            },
        },
    }
}
