//! Pre-flight checks before remote operations.
//!
//! Resolves credentials up front so that a missing secret is reported
//! before any request is made.

use crate::cli::Output;
use crate::config::Settings;
use crate::secrets::Credentials;
use anyhow::Result;

/// Resolve credentials, printing a hint if any secret is missing.
pub fn credentials(settings: &Settings) -> Result<Credentials> {
    match Credentials::load(settings) {
        Ok(credentials) => Ok(credentials),
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'finn doctor' for detailed diagnostics.");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_credentials_from_inline_values() {
        let mut settings = Settings::default();
        let scope: HashMap<String, String> = [
            "aisearch-endpoint",
            "aisearch-adminkey",
            "aoai-deploymentname",
            "aoai-api-key",
            "aoai-endpoint",
        ]
        .iter()
        .map(|k| (k.to_string(), format!("value-of-{}", k)))
        .collect();
        settings.secrets.values.insert("myscope".to_string(), scope);

        let credentials = credentials(&settings).unwrap();
        assert_eq!(credentials.deployment(), "value-of-aoai-deploymentname");
    }

    #[test]
    fn test_missing_credentials_fail() {
        let mut settings = Settings::default();
        settings.secrets.scope = "finn-preflight-test-scope-that-is-unset".to_string();
        assert!(credentials(&settings).is_err());
    }
}
