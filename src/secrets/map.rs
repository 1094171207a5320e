//! In-memory secret store, fed from the settings file.

use super::SecretStore;
use std::collections::HashMap;

/// Secrets held in a nested `scope -> key -> value` map.
#[derive(Debug, Default, Clone)]
pub struct MapSecretStore {
    values: HashMap<String, HashMap<String, String>>,
}

impl MapSecretStore {
    pub fn new(values: HashMap<String, HashMap<String, String>>) -> Self {
        Self { values }
    }
}

impl SecretStore for MapSecretStore {
    fn get(&self, scope: &str, key: &str) -> Option<String> {
        self.values.get(scope)?.get(key).cloned()
    }

    fn name(&self) -> &'static str {
        "settings"
    }
}
