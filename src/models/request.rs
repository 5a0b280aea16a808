use std::fmt;

use indexmap::IndexMap;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::utils::ZaloError;

/// Body or query parameters, kept in insertion order.
pub type Params = serde_json::Map<String, Value>;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header and parameter names masked by [`RequestState::redacted`].
pub const SENSITIVE_KEYS: &[&str] = &["access_token", "secret_key", "app_secret", "refresh_token"];
const REDACTED: &str = "***";

/// Turns a `json!({...})` literal into [`Params`].
pub fn into_params(value: Value) -> Result<Params, ZaloError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => Err(ZaloError::InvalidRequest(format!(
            "parameters must be a JSON object, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
}

impl HttpVerb {
    pub fn method(self) -> Method {
        match self {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
            HttpVerb::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// The pending request a client is assembling: target url, headers and
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    pub request_url: String,
    pub headers: IndexMap<String, String>,
    pub params: Params,
}

impl Default for RequestState {
    fn default() -> Self {
        let mut headers = IndexMap::new();
        headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());

        RequestState {
            request_url: String::new(),
            headers,
            params: Params::new(),
        }
    }
}

impl RequestState {
    /// Sets a header, replacing any existing key that differs only in case.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let existing = self
            .headers
            .keys()
            .find(|key| key.eq_ignore_ascii_case(&name))
            .cloned();

        match existing {
            Some(key) => {
                self.headers.insert(key, value.into());
            }
            None => {
                self.headers.insert(name, value.into());
            }
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn merge_params(&mut self, params: Params) {
        self.params.extend(params);
    }

    pub fn is_form_encoded(&self) -> bool {
        self.header(CONTENT_TYPE)
            .map(|ct| ct.contains(FORM_CONTENT_TYPE))
            .unwrap_or(false)
    }

    pub fn header_map(&self) -> Result<HeaderMap, ZaloError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ZaloError::InvalidRequest(format!("invalid header name {:?}", name)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ZaloError::InvalidRequest(format!("invalid value for header {}", name)))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    /// Copy with credential headers and parameters masked, for logging.
    pub fn redacted(&self) -> RequestState {
        let mut copy = self.clone();
        for (name, value) in copy.headers.iter_mut() {
            if is_sensitive(name) {
                *value = REDACTED.to_string();
            }
        }
        for (name, value) in copy.params.iter_mut() {
            if is_sensitive(name) {
                *value = Value::String(REDACTED.to_string());
            }
        }
        copy
    }

    /// Renders the request as a curl command, for debugging. Values are not masked.
    pub fn to_curl(&self, verb: HttpVerb, url: &str) -> String {
        let mut curl = format!("curl -X {} \"{}\"", verb, url);

        for (name, value) in &self.headers {
            curl.push_str(&format!(" \\\n  -H \"{}: {}\"", name, value));
        }

        if self.params.is_empty() || verb == HttpVerb::Get {
            return curl;
        }

        if self.is_form_encoded() {
            for (key, value) in flatten_params(&self.params) {
                curl.push_str(&format!(" \\\n  --data-urlencode '{}={}'", key, value));
            }
        } else {
            let body = Value::Object(self.params.clone()).to_string();
            curl.push_str(&format!(" \\\n  -d '{}'", body));
        }

        curl
    }
}

fn is_sensitive(name: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|key| key.eq_ignore_ascii_case(name))
}

/// Flattens parameters into `key=value` pairs for query strings and form
/// bodies. Nested values use bracket notation (`template_data[otp]=123456`),
/// booleans become `1`/`0` and nulls are dropped.
pub fn flatten_params(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        flatten_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(format!("{}[{}]", key, index), item, pairs);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                flatten_value(format!("{}[{}]", key, name), item, pairs);
            }
        }
    }
}
