use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::ProfileRepository;
use crate::error::AppResult;
use crate::models::PreferenceProfile;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Profile(String),
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::Profile(user_id) => write!(f, "profile:{}", user_id),
        }
    }
}

/// Creates a Redis client for profile storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Stored form of a profile
#[derive(Debug, Serialize, Deserialize)]
struct StoredProfile {
    profile: PreferenceProfile,
    saved_at: DateTime<Utc>,
}

/// Message for asynchronous profile writes
struct ProfileWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed profile storage
///
/// Reads go straight to Redis. Writes are queued to a background task so an
/// interaction request never waits on the store.
#[derive(Clone)]
pub struct RedisProfileRepository {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<ProfileWriteMessage>,
    ttl: u64,
}

/// Handle for gracefully shutting down the profile writer
pub struct ProfileWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl ProfileWriterHandle {
    /// Signals the writer task to flush pending writes, then waits for it to stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Profile writer shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Profile writer task failed");
        }
    }
}

impl RedisProfileRepository {
    /// Creates the repository and spawns its background writer
    ///
    /// Profiles expire `ttl` seconds after their last save.
    pub fn new(redis_client: Client, ttl: u64) -> (Self, ProfileWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::profile_writer_task(client, write_rx, shutdown_rx).await;
        });

        let repository = Self {
            redis_client,
            write_tx,
            ttl,
        };

        (
            repository,
            ProfileWriterHandle { shutdown_tx, task },
        )
    }

    /// Drains write messages into Redis until shutdown, then flushes the rest
    async fn profile_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<ProfileWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Profile writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write profile to Redis");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Profile writer shutting down, flushing remaining writes");

                    write_rx.close();
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush profile write during shutdown");
                        }
                    }

                    tracing::info!("Profile writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: ProfileWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileRepository for RedisProfileRepository {
    async fn load_profile(&self, user_id: &str) -> AppResult<Option<PreferenceProfile>> {
        let key = StorageKey::Profile(user_id.to_string());
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(key.to_string()).await?;

        match stored {
            Some(json) => {
                let stored: StoredProfile = serde_json::from_str(&json)?;
                tracing::debug!(user_id, saved_at = %stored.saved_at, "Loaded stored profile");
                Ok(Some(stored.profile))
            }
            None => Ok(None),
        }
    }

    async fn save_profile(&self, user_id: &str, profile: &PreferenceProfile) -> AppResult<()> {
        let stored = StoredProfile {
            profile: profile.clone(),
            saved_at: Utc::now(),
        };
        let value = serde_json::to_string(&stored)?;

        let msg = ProfileWriteMessage {
            key: StorageKey::Profile(user_id.to_string()).to_string(),
            value,
            ttl: self.ttl,
        };

        self.write_tx
            .send(msg)
            .map_err(|e| crate::error::AppError::Internal(format!("Profile writer closed: {}", e)))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_display() {
        let key = StorageKey::Profile("user-42".to_string());
        assert_eq!(format!("{}", key), "profile:user-42");
    }

    #[test]
    fn test_stored_profile_envelope() {
        let mut profile = PreferenceProfile::new();
        profile.tags.insert("Klartraum".to_string(), 0.15);
        let stored = StoredProfile {
            profile: profile.clone(),
            saved_at: Utc::now(),
        };

        let json = serde_json::to_string(&stored).unwrap();
        let decoded: StoredProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.profile, profile);
        assert!(json.contains("\"saved_at\""));
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_writer_to_stop() {
        // Nothing listens on port 1, so queued writes fail fast and are logged
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (repo, handle) = RedisProfileRepository::new(client, 60);

        repo.save_profile("user-1", &PreferenceProfile::new())
            .await
            .unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(5), handle.shutdown())
            .await
            .expect("writer did not stop");

        // The writer dropped its receiver before shutdown returned
        assert!(repo
            .save_profile("user-1", &PreferenceProfile::new())
            .await
            .is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn test_save_then_load_roundtrip() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (repo, handle) = RedisProfileRepository::new(client.clone(), 60);

        let mut profile = PreferenceProfile::new();
        profile.interaction_history.push("x".to_string());
        repo.save_profile("redis-test-user", &profile).await.unwrap();

        handle.shutdown().await;

        let loaded = repo.load_profile("redis-test-user").await.unwrap();
        assert_eq!(loaded, Some(profile));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn
            .del(StorageKey::Profile("redis-test-user".to_string()).to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn test_load_missing_profile() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (repo, _handle) = RedisProfileRepository::new(client, 60);

        let loaded = repo.load_profile("nonexistent_user_12345").await.unwrap();
        assert_eq!(loaded, None);
    }
}
