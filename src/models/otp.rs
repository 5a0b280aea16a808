use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::{Params, into_params};
use crate::utils::ZaloError;

/// Parameters for a ZNS template send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_data: Option<Value>,
    /// `development` sends to the OA admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

impl SendOtpRequest {
    pub fn new(phone: impl Into<String>) -> Self {
        SendOtpRequest {
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn template(mut self, template_id: impl Into<String>, template_data: Value) -> Self {
        self.template_id = Some(template_id.into());
        self.template_data = Some(template_data);
        self
    }

    pub fn tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }

    pub fn development_mode(mut self) -> Self {
        self.mode = Some("development".to_string());
        self
    }

    pub fn into_params(self) -> Result<Params, ZaloError> {
        into_params(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStatusRequest {
    pub message_id: String,
    pub phone: String,
}

impl MessageStatusRequest {
    pub fn new(message_id: impl Into<String>, phone: impl Into<String>) -> Self {
        MessageStatusRequest {
            message_id: message_id.into(),
            phone: phone.into(),
        }
    }

    pub fn into_params(self) -> Result<Params, ZaloError> {
        into_params(serde_json::to_value(self)?)
    }
}
