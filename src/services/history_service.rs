// src/services/history_service.rs
use crate::errors::StyleSeerError;
use crate::models::{HistoryEntry, HistoryMode};
use async_trait::async_trait;
use log::{error, warn};
use redis::{AsyncCommands, Client};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const MAX_HISTORY: usize = 10;

/// Minimal key/value surface the history needs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StyleSeerError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StyleSeerError>;
    async fn delete(&self, key: &str) -> Result<(), StyleSeerError>;
}

pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self, StyleSeerError> {
        let client = Client::open(redis_url).map_err(|e| StyleSeerError::Storage(e.to_string()))?;

        // Test connection
        let mut conn = client
            .get_async_connection()
            .await
            .map_err(|e| StyleSeerError::Storage(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| StyleSeerError::Storage(e.to_string()))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::Connection, StyleSeerError> {
        self.client
            .get_async_connection()
            .await
            .map_err(|e| StyleSeerError::Storage(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StyleSeerError> {
        let mut conn = self.connection().await?;
        conn.get(key)
            .await
            .map_err(|e| StyleSeerError::Storage(e.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StyleSeerError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| StyleSeerError::Storage(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StyleSeerError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| StyleSeerError::Storage(e.to_string()))
    }
}

/// Process-local store used when no Redis URL is configured.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StyleSeerError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StyleSeerError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StyleSeerError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

fn preference_key(client: &str, mode: HistoryMode) -> String {
    format!("styleseer:{}:{}:save-history", client, mode.as_str())
}

fn history_key(client: &str, mode: HistoryMode) -> String {
    format!("styleseer:{}:{}:history", client, mode.as_str())
}

/// Newest first, never more than `MAX_HISTORY`.
pub fn push_capped(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.insert(0, entry);
    history.truncate(MAX_HISTORY);
}

type LiveKey = (String, HistoryMode);

/// Per-client session history for each mode, written through to the store when
/// that client opts in. Clients never see each other's entries.
pub struct HistoryService {
    store: Arc<dyn KeyValueStore>,
    live: RwLock<HashMap<LiveKey, Vec<HistoryEntry>>>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Storage failures read as "not saving".
    pub async fn save_enabled(&self, client: &str, mode: HistoryMode) -> bool {
        match self.store.get(&preference_key(client, mode)).await {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed {} history preference: {}", mode.as_str(), e);
                false
            }),
            Ok(None) => false,
            Err(e) => {
                error!("Failed to read {} history preference: {}", mode.as_str(), e);
                false
            }
        }
    }

    pub async fn set_save_enabled(
        &self,
        client: &str,
        mode: HistoryMode,
        enabled: bool,
    ) -> Result<(), StyleSeerError> {
        let key = (client.to_string(), mode);
        let mut live = self.live.write().await;

        if enabled {
            let history = match live.get(&key) {
                Some(history) => history.clone(),
                None => self.load_stored(client, mode).await,
            };
            self.store
                .set(&preference_key(client, mode), true.to_string())
                .await?;
            self.persist(client, mode, &history).await?;
            live.insert(key, history);
        } else {
            self.store
                .set(&preference_key(client, mode), false.to_string())
                .await?;
            self.store.delete(&history_key(client, mode)).await?;
            live.remove(&key);
        }
        Ok(())
    }

    /// Current history for `mode`; unreadable stored history comes back empty.
    pub async fn entries(&self, client: &str, mode: HistoryMode) -> Vec<HistoryEntry> {
        let key = (client.to_string(), mode);
        if let Some(history) = self.live.read().await.get(&key) {
            return history.clone();
        }

        let mut live = self.live.write().await;
        if !live.contains_key(&key) {
            let stored = self.stored_if_enabled(client, mode).await;
            live.insert(key.clone(), stored);
        }
        live.get(&key).cloned().unwrap_or_default()
    }

    /// Prepends `entry` and returns the new list. Load, push and write-through all
    /// happen under one write guard so concurrent records never drop each other.
    pub async fn record(
        &self,
        client: &str,
        mode: HistoryMode,
        entry: HistoryEntry,
    ) -> Vec<HistoryEntry> {
        let key = (client.to_string(), mode);
        let mut live = self.live.write().await;

        if !live.contains_key(&key) {
            let stored = self.stored_if_enabled(client, mode).await;
            live.insert(key.clone(), stored);
        }
        let history = live.entry(key).or_default();
        push_capped(history, entry);
        let history = history.clone();

        if self.save_enabled(client, mode).await {
            if let Err(e) = self.persist(client, mode, &history).await {
                error!("Failed to save {} history: {}", mode.as_str(), e);
            }
        }
        history
    }

    async fn stored_if_enabled(&self, client: &str, mode: HistoryMode) -> Vec<HistoryEntry> {
        if self.save_enabled(client, mode).await {
            self.load_stored(client, mode).await
        } else {
            Vec::new()
        }
    }

    async fn load_stored(&self, client: &str, mode: HistoryMode) -> Vec<HistoryEntry> {
        let raw = match self.store.get(&history_key(client, mode)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to load {} history: {}", mode.as_str(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            error!("Failed to parse {} history from storage: {}", mode.as_str(), e);
            Vec::new()
        })
    }

    async fn persist(
        &self,
        client: &str,
        mode: HistoryMode,
        history: &[HistoryEntry],
    ) -> Result<(), StyleSeerError> {
        let value = serde_json::to_string(history)
            .map_err(|e| StyleSeerError::Serialization(e.to_string()))?;
        self.store.set(&history_key(client, mode), value).await
    }
}
