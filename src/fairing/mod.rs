use log::{error, info};
use reqwest::Client;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};

use crate::config::ZaloConfig;
use crate::services::ZaloClient;
use crate::utils::ZaloError;

/// Table read from Rocket's figment, e.g. `[default.zalo_otp]` in `Rocket.toml`.
/// Without it the standalone `ZALO_OTP_*` loader is used.
pub const CONFIG_KEY: &str = "zalo_otp";

/// Validated config plus a connection pool shared by every request's client.
pub struct ZaloOtpState {
    config: ZaloConfig,
    http: Client,
}

impl ZaloOtpState {
    pub fn new(config: ZaloConfig) -> Result<Self, ZaloError> {
        config.validate()?;
        Ok(ZaloOtpState {
            config,
            http: Client::new(),
        })
    }

    pub fn config(&self) -> &ZaloConfig {
        &self.config
    }

    /// A fresh client with an empty pending request.
    pub fn client(&self) -> ZaloClient {
        ZaloClient::from_parts(self.config.clone(), self.http.clone())
    }
}

/// Manages [`ZaloOtpState`], aborting ignition when the config is unusable.
pub fn init() -> AdHoc {
    AdHoc::try_on_ignite("Zalo OTP", |rocket| async move {
        match load(&rocket).and_then(ZaloOtpState::new) {
            Ok(state) => {
                info!(
                    "✓ Zalo OTP configured for app {} ({})",
                    state.config.app_id, state.config.business_base_url
                );
                Ok(rocket.manage(state))
            }
            Err(e) => {
                error!("✗ Zalo OTP configuration failed: {}", e);
                Err(rocket)
            }
        }
    })
}

fn load(rocket: &Rocket<Build>) -> Result<ZaloConfig, ZaloError> {
    let figment = rocket.figment();
    if figment.contains(CONFIG_KEY) {
        Ok(figment.extract_inner::<ZaloConfig>(CONFIG_KEY)?)
    } else {
        ZaloConfig::load()
    }
}
