//! Configuration settings for Finn.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub secrets: SecretSettings,
    pub search: SearchSettings,
    pub llm: LlmSettings,
    pub agent: AgentSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data (response cache).
    pub data_dir: String,
    /// Log level used when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.finn".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Where and under which names the service credentials live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretSettings {
    /// Secret scope shared by all lookups.
    pub scope: String,
    /// Key holding the search service endpoint URL.
    pub search_endpoint_key: String,
    /// Key holding the search admin API key.
    pub search_admin_key: String,
    /// Key holding the model deployment name.
    pub deployment_name_key: String,
    /// Key holding the LLM API key.
    pub llm_api_key: String,
    /// Key holding the LLM endpoint URL.
    pub llm_endpoint_key: String,
    /// Inline secret values, by scope then key. Checked before the environment.
    pub values: HashMap<String, HashMap<String, String>>,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self {
            scope: "myscope".to_string(),
            search_endpoint_key: "aisearch-endpoint".to_string(),
            search_admin_key: "aisearch-adminkey".to_string(),
            deployment_name_key: "aoai-deploymentname".to_string(),
            llm_api_key: "aoai-api-key".to_string(),
            llm_endpoint_key: "aoai-endpoint".to_string(),
            values: HashMap::new(),
        }
    }
}

/// Azure AI Search query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Name of the search index.
    pub index_name: String,
    /// Search REST API version.
    pub api_version: String,
    /// Semantic ranking configuration registered on the index.
    pub semantic_configuration: String,
    /// Vector field that vector queries run against.
    pub vector_field: String,
    /// Nearest neighbours requested by the vector query.
    pub k_nearest_neighbors: u32,
    /// Run exhaustive KNN instead of approximate search.
    pub exhaustive: bool,
    /// Maximum number of documents returned.
    pub top: u32,
    /// Fields selected from each document.
    pub select: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            index_name: "aisearch-index-recursive".to_string(),
            api_version: "2024-06-01-preview".to_string(),
            semantic_configuration: "my-semantic-config".to_string(),
            vector_field: "vector".to_string(),
            k_nearest_neighbors: 5,
            exhaustive: true,
            top: 1,
            select: vec!["id".to_string(), "content".to_string()],
        }
    }
}

/// LLM client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API flavour. Only "azure" is supported.
    pub api_type: String,
    /// Azure OpenAI API version.
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature.
    pub temperature: f32,
    /// Cache completions on disk.
    pub cache_enabled: bool,
    /// Response cache namespace.
    pub cache_seed: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_type: "azure".to_string(),
            api_version: "2024-02-15-preview".to_string(),
            timeout_secs: 120,
            temperature: 0.0,
            cache_enabled: true,
            cache_seed: 42,
        }
    }
}

/// Assistant and user proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Name of the LLM-backed assistant.
    pub assistant_name: String,
    /// System message for the assistant.
    pub system_message: String,
    /// Name of the tool-executing user proxy.
    pub user_proxy_name: String,
    /// Substring that ends the chat when found in a message.
    pub termination_token: String,
    /// Maximum automatic replies the proxy sends before giving up.
    pub max_consecutive_auto_reply: usize,
    /// What the proxy says when it has no tool results to send.
    pub default_auto_reply: String,
    /// Question used by `finn chat` when none is given.
    pub default_message: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            assistant_name: "AISearch".to_string(),
            system_message: concat!(
                "You are a helpful AI agent.",
                "You can help with Azure AI Search service.",
                "Return TERMINATE when the task is done"
            )
            .to_string(),
            user_proxy_name: "User".to_string(),
            termination_token: "TERMINATE".to_string(),
            max_consecutive_auto_reply: 100,
            default_auto_reply: String::new(),
            default_message: "Search for 'What determines the venue of a legal action brought \
                against Northwind Health?' in the above defined index"
                .to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::FinnError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the rest of the crate cannot work with.
    fn validate(&self) -> crate::error::Result<()> {
        if self.llm.api_type != "azure" {
            return Err(crate::error::FinnError::Config(format!(
                "Unsupported llm.api_type '{}' (only 'azure' is supported)",
                self.llm.api_type
            )));
        }
        if self.agent.termination_token.is_empty() {
            return Err(crate::error::FinnError::Config(
                "agent.termination_token must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("finn")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Path of the response cache database for a given seed.
    pub fn cache_path(&self, seed: u64) -> PathBuf {
        self.data_dir().join("cache").join(format!("{}.db", seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_setup() {
        let settings = Settings::default();
        assert_eq!(settings.general.log_level, "warn");
        assert_eq!(settings.search.index_name, "aisearch-index-recursive");
        assert_eq!(settings.search.k_nearest_neighbors, 5);
        assert_eq!(settings.search.top, 1);
        assert_eq!(settings.llm.timeout_secs, 120);
        assert!(settings.llm.cache_enabled);
        assert_eq!(settings.llm.cache_seed, 42);
        assert!(settings.agent.system_message.ends_with("Return TERMINATE when the task is done"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[search]
index_name = "other-index"

[secrets.values.myscope]
aoai-api-key = "abc"
"#
        )
        .unwrap();

        let settings = Settings::load_from(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(settings.search.index_name, "other-index");
        assert_eq!(settings.search.semantic_configuration, "my-semantic-config");
        assert_eq!(settings.secrets.values["myscope"]["aoai-api-key"], "abc");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.agent.assistant_name, "AISearch");
    }

    #[test]
    fn test_rejects_non_azure_api_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\napi_type = \"openai\"").unwrap();
        assert!(Settings::load_from(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut settings = Settings::default();
        settings.llm.cache_enabled = false;
        settings.llm.cache_seed = 7;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert!(!loaded.llm.cache_enabled);
        assert_eq!(loaded.llm.cache_seed, 7);
    }
}
