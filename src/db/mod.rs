use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::PreferenceProfile;

pub mod redis;

pub use self::redis::{create_redis_client, ProfileWriterHandle, RedisProfileRepository, StorageKey};

/// Storage for user preference profiles
///
/// The engine only needs to read a profile when a session starts and write
/// it back after it changes. Profiles are stored as plain JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Loads the stored profile for `user_id`, `None` if the user has none yet
    async fn load_profile(&self, user_id: &str) -> AppResult<Option<PreferenceProfile>>;

    /// Stores `profile` for `user_id`, replacing any previous one
    async fn save_profile(&self, user_id: &str, profile: &PreferenceProfile) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Process-local profile storage, lost on restart
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, PreferenceProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn load_profile(&self, user_id: &str) -> AppResult<Option<PreferenceProfile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save_profile(&self, user_id: &str, profile: &PreferenceProfile) -> AppResult<()> {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
