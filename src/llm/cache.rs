//! Completion caching.
//!
//! A cached model serializes each request (model, transcript and tool
//! schemas) into a key and replays the stored reply when the key has been
//! seen before. Each cache seed gets its own SQLite file.

use super::{ChatMessage, ChatModel, ToolSchema};
use crate::error::{FinnError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, instrument};

/// Trait for completion cache backends.
#[async_trait]
pub trait CompletionCache: Send + Sync {
    /// Look up a stored reply.
    async fn get(&self, key: &str) -> Result<Option<ChatMessage>>;

    /// Store a reply.
    async fn put(&self, key: &str, reply: &ChatMessage) -> Result<()>;

    /// Remove every entry, returning how many were removed.
    async fn clear(&self) -> Result<usize>;
}

/// In-memory completion cache, useful for tests.
#[derive(Default)]
pub struct MemoryCompletionCache {
    entries: RwLock<HashMap<String, ChatMessage>>,
}

impl MemoryCompletionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached replies.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CompletionCache for MemoryCompletionCache {
    async fn get(&self, key: &str) -> Result<Option<ChatMessage>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| FinnError::Agent(format!("Failed to acquire lock: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, reply: &ChatMessage) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| FinnError::Agent(format!("Failed to acquire lock: {}", e)))?;
        entries.insert(key.to_string(), reply.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| FinnError::Agent(format!("Failed to acquire lock: {}", e)))?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS completions (
        key TEXT PRIMARY KEY,
        reply_json TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

/// SQLite-backed completion cache.
pub struct SqliteCompletionCache {
    conn: Mutex<Connection>,
}

impl SqliteCompletionCache {
    /// Open (or create) a cache database at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened completion cache at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FinnError::Agent(format!("Failed to acquire lock: {}", e)))
    }
}

#[async_trait]
impl CompletionCache for SqliteCompletionCache {
    async fn get(&self, key: &str) -> Result<Option<ChatMessage>> {
        let conn = self.lock()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT reply_json FROM completions WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, reply: &ChatMessage) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO completions (key, reply_json, created_at) VALUES (?1, ?2, ?3)",
            params![key, serde_json::to_string(reply)?, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM completions", [])?;
        Ok(removed)
    }
}

#[derive(Serialize)]
struct CacheKey<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    tools: &'a [ToolSchema],
}

/// A chat model that replays cached replies for identical requests.
pub struct CachedChatModel<M> {
    inner: M,
    cache: Arc<dyn CompletionCache>,
}

impl<M: ChatModel> CachedChatModel<M> {
    pub fn new(inner: M, cache: Arc<dyn CompletionCache>) -> Self {
        Self { inner, cache }
    }

    fn cache_key(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<String> {
        Ok(serde_json::to_string(&CacheKey {
            model: self.inner.model(),
            messages,
            tools,
        })?)
    }
}

#[async_trait]
impl<M: ChatModel> ChatModel for CachedChatModel<M> {
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<ChatMessage> {
        let key = self.cache_key(messages, tools)?;

        if let Some(reply) = self.cache.get(&key).await? {
            debug!("Completion cache hit");
            return Ok(reply);
        }

        let reply = self.inner.complete(messages, tools).await?;
        self.cache.put(&key, &reply).await?;
        Ok(reply)
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
