use serde_json::Value;

use crate::models::Params;

const DOMESTIC_PREFIX: char = '0';
const COUNTRY_CODE: &str = "84";

/// Rewrites a domestic Vietnamese number (`0987654321`) to international form
/// (`84987654321`). Anything not starting with `0` is returned untouched.
pub fn format_phone_number(phone: &str) -> String {
    match phone.strip_prefix(DOMESTIC_PREFIX) {
        Some(rest) => format!("{}{}", COUNTRY_CODE, rest),
        None => phone.to_string(),
    }
}

/// Normalizes the `phone` entry of a parameter set, if present.
pub fn format_params(mut params: Params) -> Params {
    if let Some(Value::String(phone)) = params.get_mut("phone") {
        *phone = format_phone_number(phone);
    }
    params
}
