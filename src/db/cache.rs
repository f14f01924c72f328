use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::{BundleParams, Category};

/// Storage key for a cached backend response, derived from its query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    HomeFeed { category: Category, limit: u32 },
    Search(String),
    Details(u64),
    Bundle { query: String, params: BundleParams },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::HomeFeed { category, limit } => write!(f, "home:{}:{}", category, limit),
            CacheKey::Search(query) => write!(f, "search:{}", query.trim().to_lowercase()),
            CacheKey::Details(id) => write!(f, "details:{}", id),
            CacheKey::Bundle { query, params } => write!(
                f,
                "bundle:{}:{}:{}:{}",
                query.trim().to_lowercase(),
                params.tfidf_top_n,
                params.hybrid_top_n,
                params.genre_limit
            ),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

#[derive(Clone)]
enum Store {
    Redis {
        conn: ConnectionManager,
        write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
        timeout: Duration,
    },
    Memory(moka::future::Cache<String, String>),
}

/// Response cache shared by every backend call
///
/// Values are stored as JSON strings. Redis is used when configured; otherwise
/// an in-process cache with a fixed TTL holds the entries.
///
/// With Redis, a single multiplexed [`ConnectionManager`] is shared by reads
/// and the background writer. It reconnects on its own after Redis restarts.
/// Reads are bounded by a timeout, so an unreachable Redis degrades to cache
/// misses instead of stalling page renders.
#[derive(Clone)]
pub struct Cache {
    store: Store,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and waits until it has
    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).await.is_err() {
            tracing::warn!("Cache writer already stopped");
        }
        tracing::info!("Cache writer shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Connects to Redis and starts the async write background task
    ///
    /// `timeout` bounds the initial connection and every later read.
    pub async fn redis(
        redis_client: Client,
        timeout: Duration,
    ) -> AppResult<(Self, CacheWriterHandle)> {
        let conn = tokio::time::timeout(timeout, ConnectionManager::new(redis_client))
            .await
            .map_err(|_| AppError::Internal("Timed out connecting to Redis".to_string()))??;

        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_conn = conn.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(writer_conn, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            store: Store::Redis {
                conn,
                write_tx,
                timeout,
            },
        };

        Ok((cache, CacheWriterHandle { shutdown_tx, task }))
    }

    /// Creates an in-process cache; `ttl` applies to every entry
    pub fn in_memory(capacity: u64, ttl: Duration) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self {
            store: Store::Memory(cache),
        }
    }

    /// Short name of the active backend, for logging
    pub fn backend_name(&self) -> &'static str {
        match self.store {
            Store::Redis { .. } => "redis",
            Store::Memory(_) => "memory",
        }
    }

    /// Applies queued writes until shutdown is signalled
    ///
    /// On shutdown the queue is drained without waiting: every `Cache` clone
    /// holds a sender, so waiting for the channel to close would never end
    /// while the server state is alive.
    async fn cache_writer_task(
        mut conn: ConnectionManager,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&mut conn, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&mut conn, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(conn: &mut ConnectionManager, msg: CacheWriteMessage) -> AppResult<()> {
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    ///
    /// Errors (Redis unreachable or too slow, or a stored value of the wrong
    /// shape) are returned to the caller; `cached!` logs them and fetches.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = match &self.store {
            Store::Redis { conn, timeout, .. } => {
                let mut conn = conn.clone();
                tokio::time::timeout(*timeout, conn.get::<_, Option<String>>(key.to_string()))
                    .await
                    .map_err(|_| AppError::Internal("Cache read timed out".to_string()))??
            }
            Store::Memory(cache) => cache.get(&key.to_string()).await,
        };

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value without waiting on Redis
    ///
    /// Redis writes are handed to the background writer. In-memory inserts
    /// complete before this returns.
    pub async fn store<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        match &self.store {
            Store::Redis { write_tx, .. } => {
                let msg = CacheWriteMessage {
                    key: key.to_string(),
                    value: json,
                    ttl,
                };
                if let Err(e) = write_tx.send(msg) {
                    tracing::error!(error = %e, "Failed to send cache write message");
                }
            }
            Store::Memory(cache) => cache.insert(key.to_string(), json).await,
        }
    }
}
