//! Secret resolution for service credentials.
//!
//! Credentials are looked up by `(scope, key)` pairs, the same addressing
//! scheme notebook secret scopes use. Backends can be layered so that inline
//! values from the settings file win over the environment.

mod env;
mod map;

pub use env::EnvSecretStore;
pub use map::MapSecretStore;

use crate::config::{SecretSettings, Settings};
use crate::error::{FinnError, Result};
use tracing::debug;

/// A source of named secrets.
pub trait SecretStore: Send + Sync {
    /// Look up a secret, returning `None` if this store does not hold it.
    fn get(&self, scope: &str, key: &str) -> Option<String>;

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Look up a secret that must exist.
    fn require(&self, scope: &str, key: &str) -> Result<String> {
        self.get(scope, key).ok_or_else(|| FinnError::Secret {
            scope: scope.to_string(),
            key: key.to_string(),
        })
    }
}

/// Tries each store in order and returns the first hit.
pub struct LayeredSecretStore {
    stores: Vec<Box<dyn SecretStore>>,
}

impl LayeredSecretStore {
    /// Create a layered store from an ordered list of backends.
    pub fn new(stores: Vec<Box<dyn SecretStore>>) -> Self {
        Self { stores }
    }

    /// Settings-file values first, then the process environment.
    pub fn from_settings(settings: &SecretSettings) -> Self {
        Self::new(vec![
            Box::new(MapSecretStore::new(settings.values.clone())),
            Box::new(EnvSecretStore::new()),
        ])
    }
}

impl SecretStore for LayeredSecretStore {
    fn get(&self, scope: &str, key: &str) -> Option<String> {
        self.stores.iter().find_map(|store| {
            let value = store.get(scope, key);
            if value.is_some() {
                debug!("Resolved secret {}/{} from {}", scope, key, store.name());
            }
            value
        })
    }

    fn name(&self) -> &'static str {
        "layered"
    }
}

/// Service credentials, resolved once at startup and read-only afterwards.
#[derive(Clone)]
pub struct Credentials {
    search_endpoint: String,
    search_key: String,
    deployment: String,
    llm_api_key: String,
    llm_endpoint: String,
}

impl Credentials {
    /// Resolve all five credentials from a secret store.
    pub fn resolve(store: &dyn SecretStore, settings: &SecretSettings) -> Result<Self> {
        let scope = settings.scope.as_str();
        Ok(Self {
            search_endpoint: store.require(scope, &settings.search_endpoint_key)?,
            search_key: store.require(scope, &settings.search_admin_key)?,
            deployment: store.require(scope, &settings.deployment_name_key)?,
            llm_api_key: store.require(scope, &settings.llm_api_key)?,
            llm_endpoint: store.require(scope, &settings.llm_endpoint_key)?,
        })
    }

    /// Resolve credentials using the default layered store for these settings.
    pub fn load(settings: &Settings) -> Result<Self> {
        let store = LayeredSecretStore::from_settings(&settings.secrets);
        Self::resolve(&store, &settings.secrets)
    }

    pub fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn llm_api_key(&self) -> &str {
        &self.llm_api_key
    }

    pub fn llm_endpoint(&self) -> &str {
        &self.llm_endpoint
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("search_endpoint", &self.search_endpoint)
            .field("search_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("llm_api_key", &"<redacted>")
            .field("llm_endpoint", &self.llm_endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_scope() -> HashMap<String, HashMap<String, String>> {
        let scope: HashMap<String, String> = [
            ("aisearch-endpoint", "https://search.example.net"),
            ("aisearch-adminkey", "search-key"),
            ("aoai-deploymentname", "gpt-4"),
            ("aoai-api-key", "llm-key"),
            ("aoai-endpoint", "https://llm.example.net"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        HashMap::from([("myscope".to_string(), scope)])
    }

    #[test]
    fn test_resolve_all_credentials() {
        let store = MapSecretStore::new(full_scope());
        let creds = Credentials::resolve(&store, &SecretSettings::default()).unwrap();

        assert_eq!(creds.search_endpoint(), "https://search.example.net");
        assert_eq!(creds.search_key(), "search-key");
        assert_eq!(creds.deployment(), "gpt-4");
        assert_eq!(creds.llm_api_key(), "llm-key");
        assert_eq!(creds.llm_endpoint(), "https://llm.example.net");
    }

    #[test]
    fn test_missing_secret_names_scope_and_key() {
        let mut values = full_scope();
        values.get_mut("myscope").unwrap().remove("aoai-api-key");
        let store = MapSecretStore::new(values);

        let err = Credentials::resolve(&store, &SecretSettings::default()).unwrap_err();
        match err {
            FinnError::Secret { scope, key } => {
                assert_eq!(scope, "myscope");
                assert_eq!(key, "aoai-api-key");
            }
            other => panic!("Expected Secret error, got {:?}", other),
        }
    }

    #[test]
    fn test_layered_prefers_first_store() {
        let first = MapSecretStore::new(HashMap::from([(
            "myscope".to_string(),
            HashMap::from([("aoai-api-key".to_string(), "from-file".to_string())]),
        )]));
        let second = MapSecretStore::new(full_scope());
        let layered = LayeredSecretStore::new(vec![Box::new(first), Box::new(second)]);

        assert_eq!(layered.get("myscope", "aoai-api-key").as_deref(), Some("from-file"));
        assert_eq!(layered.get("myscope", "aoai-deploymentname").as_deref(), Some("gpt-4"));
        assert_eq!(layered.get("myscope", "unknown"), None);
    }

    #[test]
    fn test_from_settings_prefers_inline_then_env() {
        temp_env::with_var("MYSCOPE_AOAI_API_KEY", Some("from-env"), || {
            let mut settings = SecretSettings::default();
            settings.values.insert(
                "myscope".to_string(),
                HashMap::from([("aoai-api-key".to_string(), "from-file".to_string())]),
            );
            let store = LayeredSecretStore::from_settings(&settings);
            assert_eq!(store.get("myscope", "aoai-api-key").as_deref(), Some("from-file"));

            let store = LayeredSecretStore::from_settings(&SecretSettings::default());
            assert_eq!(store.get("myscope", "aoai-api-key").as_deref(), Some("from-env"));
        });
    }

    #[test]
    fn test_debug_redacts_keys() {
        let store = MapSecretStore::new(full_scope());
        let creds = Credentials::resolve(&store, &SecretSettings::default()).unwrap();
        let printed = format!("{:?}", creds);

        assert!(!printed.contains("search-key"));
        assert!(!printed.contains("llm-key"));
        assert!(printed.contains("<redacted>"));
    }
}
