use std::fmt;
use std::time::Duration;

use log::{Level, debug, info, log_enabled, trace, warn};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::{ZaloConfig, is_absolute_url};
use crate::models::{
    FORM_CONTENT_TYPE, CONTENT_TYPE, HttpVerb, Params, RequestState, flatten_params,
};
use crate::utils::{ZaloError, ZaloResponse, format_params, format_phone_number};

// OAuth host
pub const ACCESS_TOKEN_URI: &str = "oa/access_token";
pub const GRANT_TYPE_REFRESH_TOKEN: &str = "refresh_token";

// Business host
pub const SEND_OTP_URI: &str = "message/template";
pub const GET_STATUS_MESSAGE_URI: &str = "message/status";
pub const OTP_INFO_URI: &str = "otp/info";

/// Client for the Zalo OTP / ZNS API.
///
/// Builder methods (`set_request_url`, `set_headers`, `set_params`, ...) mutate
/// the client's pending request in place and accumulate until `flush_params` or
/// `reset` is called. The domain operations (`send_otp`, `get_status_message`,
/// `refresh_token`, `get_otp_info`) only read the pending headers: they build
/// their own url and parameters per call and leave the pending request as it was.
///
/// Create one client per logical request scope. Cloning is cheap; the underlying
/// connection pool is shared.
#[derive(Clone)]
pub struct ZaloClient {
    config: ZaloConfig,
    http: Client,
    state: RequestState,
    refresh_token: String,
}

impl fmt::Debug for ZaloClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZaloClient")
            .field("config", &self.config)
            .field("state", &self.state.redacted())
            .field("refresh_token", &if self.refresh_token.is_empty() { "" } else { "***" })
            .finish()
    }
}

impl ZaloClient {
    pub fn new(config: ZaloConfig) -> Result<Self, ZaloError> {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: ZaloConfig, http: Client) -> Result<Self, ZaloError> {
        config.validate()?;
        Ok(Self::from_parts(config, http))
    }

    /// Skips validation; callers hold an already validated config.
    pub(crate) fn from_parts(config: ZaloConfig, http: Client) -> Self {
        ZaloClient {
            config,
            http,
            state: RequestState::default(),
            refresh_token: String::new(),
        }
    }

    pub fn config(&self) -> &ZaloConfig {
        &self.config
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /* ----------------------------- builder ----------------------------- */

    /// Points the pending request at `uri`.
    ///
    /// An empty `uri` selects the base url itself, an absolute `http(s)://` uri
    /// is kept verbatim and anything else is joined onto the base url.
    pub fn set_request_url(&mut self, uri: &str, is_business: bool) -> &mut Self {
        let base = self.config.base_url(is_business);
        self.state.request_url = if uri.is_empty() {
            base.to_string()
        } else if is_absolute_url(uri) {
            uri.to_string()
        } else {
            join_url(base, uri)
        };
        self
    }

    pub fn get_url(&self) -> &str {
        &self.state.request_url
    }

    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.state.set_header(name, value);
        }
        self
    }

    /// Zalo expects the token in an `access_token` header rather than `Authorization`.
    pub fn set_authorization(&mut self, access_token: &str) -> &mut Self {
        self.state.set_header("access_token", access_token);
        self
    }

    pub fn set_refresh_token(&mut self, refresh_token: &str) -> &mut Self {
        self.refresh_token = refresh_token.to_string();
        self
    }

    pub fn set_params(&mut self, params: Params) -> &mut Self {
        self.state.merge_params(params);
        self
    }

    pub fn flush_params(&mut self) -> &mut Self {
        self.state.params.clear();
        self
    }

    /// Drops the pending url, headers and params. The refresh token is kept.
    pub fn reset(&mut self) -> &mut Self {
        self.state = RequestState::default();
        self
    }

    pub fn format_phone_number(&self, phone: &str) -> String {
        format_phone_number(phone)
    }

    pub fn format_params(&self, params: Params) -> Params {
        format_params(params)
    }

    /// Curl rendering of the pending request.
    pub fn to_curl(&self, verb: HttpVerb) -> String {
        self.state.to_curl(verb, &self.state.request_url)
    }

    /* ----------------------------- domain operations ----------------------------- */

    /// Sends a ZNS template message (the OTP) as JSON to `message/template`.
    ///
    /// `phone` is normalized, and `template_id` falls back to the configured one.
    pub async fn send_otp(&self, params: Params) -> Result<ZaloResponse, ZaloError> {
        let mut params = format_params(params);
        if !has_value(&params, "template_id") {
            if let Some(template_id) = &self.config.template_id {
                params.insert("template_id".to_string(), Value::String(template_id.clone()));
            }
        }

        info!("Sending Zalo OTP to {}", phone_of(&params));

        let state = self.scoped_state(params);
        let url = join_url(&self.config.business_base_url, SEND_OTP_URI);
        self.dispatch(HttpVerb::Post, &url, &state).await
    }

    /// Looks up delivery status; `message_id` and `phone` go in the query string.
    pub async fn get_status_message(&self, params: Params) -> Result<ZaloResponse, ZaloError> {
        let params = format_params(params);

        debug!("Checking Zalo message status for {}", phone_of(&params));

        let state = self.scoped_state(params);
        let url = join_url(&self.config.business_base_url, GET_STATUS_MESSAGE_URI);
        self.dispatch(HttpVerb::Get, &url, &state).await
    }

    /// Exchanges the refresh token set with [`set_refresh_token`](Self::set_refresh_token)
    /// for a new token pair. Persisting the result is up to the caller.
    pub async fn refresh_token(&self) -> Result<ZaloResponse, ZaloError> {
        if self.refresh_token.is_empty() {
            return Err(ZaloError::Configuration("refresh token not set".to_string()));
        }

        let mut params = Params::new();
        params.insert("app_id".to_string(), Value::String(self.config.app_id.clone()));
        params.insert(
            "grant_type".to_string(),
            Value::String(GRANT_TYPE_REFRESH_TOKEN.to_string()),
        );
        params.insert(
            "refresh_token".to_string(),
            Value::String(self.refresh_token.clone()),
        );

        let mut state = self.scoped_state(params);
        state.set_header("secret_key", self.config.app_secret.as_str());
        state.set_header(CONTENT_TYPE, FORM_CONTENT_TYPE);

        info!("Refreshing Zalo access token for app {}", self.config.app_id);

        let url = join_url(&self.config.oauth_base_url, ACCESS_TOKEN_URI);
        self.dispatch(HttpVerb::Post, &url, &state).await
    }

    pub async fn get_otp_info(&self, phone: &str) -> Result<ZaloResponse, ZaloError> {
        let mut params = Params::new();
        params.insert("app_id".to_string(), Value::String(self.config.app_id.clone()));
        params.insert(
            "app_secret".to_string(),
            Value::String(self.config.app_secret.clone()),
        );
        params.insert("phone".to_string(), Value::String(format_phone_number(phone)));

        let state = self.scoped_state(params);
        let url = join_url(&self.config.business_base_url, OTP_INFO_URI);
        self.dispatch(HttpVerb::Get, &url, &state).await
    }

    /* ----------------------------- generic verbs ----------------------------- */

    pub async fn get(
        &mut self,
        endpoint: Option<&str>,
        params: Option<Params>,
    ) -> Result<ZaloResponse, ZaloError> {
        self.execute(HttpVerb::Get, endpoint, params).await
    }

    pub async fn post(
        &mut self,
        endpoint: Option<&str>,
        params: Option<Params>,
    ) -> Result<ZaloResponse, ZaloError> {
        self.execute(HttpVerb::Post, endpoint, params).await
    }

    pub async fn put(
        &mut self,
        endpoint: Option<&str>,
        params: Option<Params>,
    ) -> Result<ZaloResponse, ZaloError> {
        self.execute(HttpVerb::Put, endpoint, params).await
    }

    pub async fn patch(
        &mut self,
        endpoint: Option<&str>,
        params: Option<Params>,
    ) -> Result<ZaloResponse, ZaloError> {
        self.execute(HttpVerb::Patch, endpoint, params).await
    }

    /// Sends the pending request.
    ///
    /// `endpoint` may be absolute, or relative to the current request url. Given
    /// `params` are merged into the pending ones and stay there afterwards.
    pub async fn execute(
        &mut self,
        verb: HttpVerb,
        endpoint: Option<&str>,
        params: Option<Params>,
    ) -> Result<ZaloResponse, ZaloError> {
        let url = self.resolve_url(verb, endpoint)?;

        if let Some(params) = params {
            self.state.merge_params(params);
        }

        self.dispatch(verb, &url, &self.state).await
    }

    fn resolve_url(&self, verb: HttpVerb, endpoint: Option<&str>) -> Result<String, ZaloError> {
        let current = self.state.request_url.as_str();

        match endpoint.filter(|e| !e.is_empty()) {
            Some(endpoint) if is_absolute_url(endpoint) => Ok(endpoint.to_string()),
            Some(endpoint) if !current.is_empty() => Ok(join_url(current, endpoint)),
            None if !current.is_empty() => Ok(current.to_string()),
            _ => Err(ZaloError::InvalidRequest(format!(
                "No URL provided for {} request",
                verb
            ))),
        }
    }

    /* ----------------------------- transport ----------------------------- */

    fn scoped_state(&self, params: Params) -> RequestState {
        RequestState {
            request_url: String::new(),
            headers: self.state.headers.clone(),
            params,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    async fn dispatch(
        &self,
        verb: HttpVerb,
        url: &str,
        state: &RequestState,
    ) -> Result<ZaloResponse, ZaloError> {
        let base = Url::parse(url)
            .map_err(|e| ZaloError::InvalidRequest(format!("invalid url {:?}: {}", url, e)))?;
        let headers = state.header_map()?;
        let has_params = !state.params.is_empty();
        let in_query = verb == HttpVerb::Get && has_params;

        let target = if in_query { with_query(&base, &state.params) } else { base.clone() };

        debug!("Zalo {} {}{}", verb, base.origin().ascii_serialization(), base.path());
        if log_enabled!(Level::Trace) {
            let shown = state.redacted();
            let shown_url = if in_query { with_query(&base, &shown.params) } else { base };
            trace!("{}", shown.to_curl(verb, shown_url.as_str()));
        }

        let mut request = self
            .http
            .request(verb.method(), target)
            .headers(headers)
            .timeout(self.timeout());

        if verb != HttpVerb::Get && has_params {
            request = if state.is_form_encoded() {
                request.form(&flatten_params(&state.params))
            } else {
                request.json(&state.params)
            };
        }

        let response = ZaloResponse::read(request.send().await?).await?;

        if !response.is_success() {
            warn!("Zalo {} {} returned HTTP {}", verb, url_path(url), response.status());
        }

        Ok(response)
    }
}

fn with_query(base: &Url, params: &Params) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().extend_pairs(flatten_params(params));
    url
}

fn join_url(base: &str, uri: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), uri.trim_start_matches('/'))
}

fn url_path(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

fn has_value(params: &Params, key: &str) -> bool {
    match params.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn phone_of(params: &Params) -> &str {
    params.get("phone").and_then(Value::as_str).unwrap_or("<no phone>")
}
