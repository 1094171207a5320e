//! Finn - Azure AI Search assistant
//!
//! A CLI and library in which an LLM assistant answers questions by calling a
//! hybrid search tool over an Azure AI Search index.
//!
//! The name "Finn" comes from the Norwegian word for "find."
//!
//! # Architecture
//!
//! - `config` - Settings file management
//! - `secrets` - Credential lookup by scope and key
//! - `search` - Hybrid keyword/vector/semantic search and the retrieval function
//! - `llm` - Chat model abstraction, Azure OpenAI backend and completion cache
//! - `agent` - Assistant and user proxy agents, tool registry and chat loop
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use finn::agent::build_search_agents;
//! use finn::config::Settings;
//! use finn::secrets::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::load(&settings)?;
//!     let (assistant, proxy) = build_search_agents(&settings, &credentials)?;
//!
//!     let result = proxy
//!         .initiate_chat(&assistant, "What determines the venue of a legal action?")
//!         .await?;
//!     println!("{}", result.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod search;
pub mod secrets;

pub use error::{FinnError, Result};
