//! Environment-variable secret store.

use super::SecretStore;

/// Reads secrets from environment variables named `<SCOPE>_<KEY>`.
///
/// Names are upper-cased and every non-alphanumeric character becomes `_`,
/// so `("myscope", "aoai-api-key")` reads `MYSCOPE_AOAI_API_KEY`.
#[derive(Debug, Default, Clone)]
pub struct EnvSecretStore {
    prefix: Option<String>,
}

impl EnvSecretStore {
    /// Create a store reading unprefixed variables.
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Create a store that prepends `<PREFIX>_` to every variable name.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
        }
    }

    /// Environment variable name for a scope and key.
    pub fn var_name(&self, scope: &str, key: &str) -> String {
        let raw = match &self.prefix {
            Some(prefix) => format!("{}_{}_{}", prefix, scope, key),
            None => format!("{}_{}", scope, key),
        };
        raw.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, scope: &str, key: &str) -> Option<String> {
        std::env::var(self.var_name(scope, key))
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_name() {
        let store = EnvSecretStore::new();
        assert_eq!(store.var_name("myscope", "aoai-api-key"), "MYSCOPE_AOAI_API_KEY");

        let store = EnvSecretStore::with_prefix("finn");
        assert_eq!(
            store.var_name("myscope", "aisearch-endpoint"),
            "FINN_MYSCOPE_AISEARCH_ENDPOINT"
        );
    }

    #[test]
    fn test_reads_environment() {
        temp_env::with_var("FINNTEST_MYSCOPE_AISEARCH_ADMINKEY", Some("secret"), || {
            let store = EnvSecretStore::with_prefix("finntest");
            assert_eq!(
                store.get("myscope", "aisearch-adminkey").as_deref(),
                Some("secret")
            );
        });
    }

    #[test]
    fn test_empty_variable_is_missing() {
        temp_env::with_var("FINNTEST_EMPTY_KEY", Some(""), || {
            let store = EnvSecretStore::with_prefix("finntest");
            assert_eq!(store.get("empty", "key"), None);
        });
    }
}
