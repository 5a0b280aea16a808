use serde::{Deserialize, Deserializer, Serialize};

/// Token pair returned by a successful `oa/access_token` refresh.
///
/// Zalo sends `expires_in` as a string of seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, deserialize_with = "seconds")]
    pub expires_in: Option<u64>,
}

fn seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_expiry() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":"90000"}"#,
        )
        .unwrap();
        assert_eq!(token.expires_in, Some(90000));
    }

    #[test]
    fn parses_numeric_or_missing_expiry() {
        let token: AccessToken =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r","expires_in":3600}"#)
                .unwrap();
        assert_eq!(token.expires_in, Some(3600));

        let token: AccessToken =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(token.expires_in, None);
    }
}
