use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::ZaloErrorCode;

/// -----------------------------
/// Client error
/// -----------------------------
#[derive(Debug, Error)]
pub enum ZaloError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("zalo error {code} (HTTP {status}): {message}")]
    Upstream {
        status: u16,
        code: i64,
        message: String,
        detail: Option<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<rocket::figment::Error> for ZaloError {
    fn from(err: rocket::figment::Error) -> Self {
        ZaloError::Configuration(err.to_string())
    }
}

impl ZaloError {
    /// Zalo error code carried by an upstream failure.
    pub fn zalo_code(&self) -> Option<i64> {
        match self {
            ZaloError::Upstream { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// -----------------------------
/// Raw API response
/// -----------------------------
///
/// Whatever the transport returned, read to completion. Nothing here fails on a
/// non-2xx status; use [`ZaloResponse::error_for_status`] to opt in.
#[derive(Debug, Clone)]
pub struct ZaloResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ZaloResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        ZaloResponse {
            status,
            headers,
            body: body.into(),
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ZaloError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(ZaloResponse::new(status, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ZaloError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The `error` field of a JSON body, if there is one.
    pub fn error_code(&self) -> Option<i64> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        match value.get("error")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Builds an upstream error when the status is not 2xx or the body carries a
    /// non-zero Zalo error code.
    pub fn zalo_error(&self) -> Option<ZaloError> {
        let code = self.error_code();
        let failed_code = code.filter(|c| !ZaloErrorCode::is_success(*c));

        if self.status.is_success() && failed_code.is_none() {
            return None;
        }

        let code = failed_code.unwrap_or(ZaloErrorCode::UnknownError.code());
        let detail = serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));

        Some(ZaloError::Upstream {
            status: self.status.as_u16(),
            code,
            message: ZaloErrorCode::message(code).to_string(),
            detail,
        })
    }

    pub fn error_for_status(self) -> Result<Self, ZaloError> {
        match self.zalo_error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
