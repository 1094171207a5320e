//! Configuration module for Finn.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AgentSettings, GeneralSettings, LlmSettings, SearchSettings, SecretSettings, Settings,
};
