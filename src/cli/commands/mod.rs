//! CLI command implementations.

mod cache;
mod chat;
mod config;
mod doctor;
mod retrieve;
mod search;

pub use cache::run_cache;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use retrieve::run_retrieve;
pub use search::run_search;
