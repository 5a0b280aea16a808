use rocket::figment::{Figment, providers::{Env, Format, Serialized, Toml}};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::fmt;

use crate::utils::ZaloError;

pub const DEFAULT_OAUTH_BASE_URL: &str = "https://oauth.zaloapp.com/v4/";
pub const DEFAULT_BUSINESS_BASE_URL: &str = "https://business.openapi.zalo.me/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

const ENV_PREFIX: &str = "ZALO_OTP_";
// Read verbatim from the environment; figment would parse `0123` into `123`.
const VERBATIM_ENV_KEYS: &[&str] = &["app_id", "app_secret", "template_id"];

/// Settings for talking to the Zalo OAuth and business APIs.
///
/// Keys match the `ZALO_OTP_*` environment variables, so `ZALO_OTP_BASE_URL`
/// feeds `oauth_base_url` and `ZALO_OTP_TIMEOUT` feeds `timeout_seconds`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZaloConfig {
    #[serde(rename = "base_url")]
    pub oauth_base_url: String,
    pub business_base_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub app_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub app_secret: String,
    #[serde(
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub template_id: Option<String>,
    #[serde(rename = "timeout")]
    pub timeout_seconds: u64,
    /// Carried for callers that implement their own retry policy; the client never retries.
    pub retry_attempts: u32,
}

impl Default for ZaloConfig {
    fn default() -> Self {
        ZaloConfig {
            oauth_base_url: DEFAULT_OAUTH_BASE_URL.to_string(),
            business_base_url: DEFAULT_BUSINESS_BASE_URL.to_string(),
            app_id: String::new(),
            app_secret: String::new(),
            template_id: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}

impl fmt::Debug for ZaloConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZaloConfig")
            .field("oauth_base_url", &self.oauth_base_url)
            .field("business_base_url", &self.business_base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"***")
            .field("template_id", &self.template_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl ZaloConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        ZaloConfig {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_base_urls(
        mut self,
        oauth_base_url: impl Into<String>,
        business_base_url: impl Into<String>,
    ) -> Self {
        self.oauth_base_url = oauth_base_url.into();
        self.business_base_url = business_base_url.into();
        self
    }

    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    fn figment() -> Figment {
        let profile = env::var("ZALO_OTP_PROFILE").unwrap_or_else(|_| "default".to_string());

        let mut figment = Figment::new()
            .merge(Toml::file("ZaloOtp.toml").nested())
            .select(&profile)
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]).global());

        for key in VERBATIM_ENV_KEYS {
            let name = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Ok(value) = env::var(&name) {
                figment = figment.merge(Serialized::global(*key, value));
            }
        }

        figment
    }

    /// Loads `.env`, then `ZaloOtp.toml`, then `ZALO_OTP_*` variables.
    pub fn load() -> Result<Self, ZaloError> {
        dotenvy::dotenv().ok();
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ZaloError> {
        Ok(figment.extract::<ZaloConfig>()?)
    }

    pub fn validate(&self) -> Result<(), ZaloError> {
        if self.app_id.trim().is_empty() {
            return Err(ZaloError::Configuration("ZALO_OTP_APP_ID not configured".to_string()));
        }
        if self.app_secret.trim().is_empty() {
            return Err(ZaloError::Configuration(
                "ZALO_OTP_APP_SECRET not configured".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ZaloError::Configuration(
                "ZALO_OTP_TIMEOUT must be at least 1 second".to_string(),
            ));
        }

        for (key, url) in [
            ("base_url", &self.oauth_base_url),
            ("business_base_url", &self.business_base_url),
        ] {
            if !is_absolute_url(url) {
                return Err(ZaloError::Configuration(format!(
                    "{} must be an absolute http(s) url, got {:?}",
                    key, url
                )));
            }
        }

        Ok(())
    }

    pub fn base_url(&self, is_business: bool) -> &str {
        if is_business {
            &self.business_base_url
        } else {
            &self.oauth_base_url
        }
    }
}

pub(crate) fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// Env values such as `ZALO_OTP_APP_ID=1234` arrive as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Unsigned(n) => n.to_string(),
            StringOrNumber::Signed(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?
        .map(String::from)
        .filter(|s| !s.is_empty()))
}
