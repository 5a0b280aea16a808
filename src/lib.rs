//! Client for the Zalo OTP / ZNS messaging API.
//!
//! ```no_run
//! use serde_json::json;
//! use zalo_otp::{ZaloClient, ZaloConfig, into_params};
//!
//! # async fn run() -> Result<(), zalo_otp::ZaloError> {
//! let mut zalo = ZaloClient::new(ZaloConfig::load()?)?;
//! zalo.set_authorization("oa-access-token");
//!
//! let response = zalo
//!     .send_otp(into_params(json!({
//!         "phone": "0912345678",
//!         "template_id": "231234",
//!         "template_data": { "otp": "123456" },
//!     }))?)
//!     .await?
//!     .error_for_status()?;
//! println!("{}", response.body());
//! # Ok(())
//! # }
//! ```
//!
//! With Rocket, attach [`fairing::init`] and take a `ZaloClient` in any handler.

pub mod config;
pub mod fairing;
pub mod guards;
pub mod models;
pub mod services;
pub mod utils;

pub use config::ZaloConfig;
pub use fairing::ZaloOtpState;
pub use models::{
    AccessToken, HttpVerb, MessageStatusRequest, Params, RequestState, SendOtpRequest,
    ZaloErrorCode, into_params,
};
pub use services::ZaloClient;
pub use utils::{ZaloError, ZaloResponse, format_phone_number};
