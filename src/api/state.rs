use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, RwLock};

use crate::db::{InMemoryProfileRepository, ProfileRepository};
use crate::models::Item;
use crate::services::{PreferenceStore, DEFAULT_LIMIT};

/// Untouched sessions are dropped after this long
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

const MAX_OPEN_SESSIONS: u64 = 100_000;

type Session = Arc<Mutex<PreferenceStore>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Candidate items in insertion order
    pub catalog: Arc<RwLock<Vec<Item>>>,
    /// Open sessions, one store per user, each behind its own lock.
    /// An evicted session reloads from the repository on next access.
    sessions: Cache<String, Session>,
    pub repository: Arc<dyn ProfileRepository>,
    pub default_limit: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates an empty state with in-memory profile storage
    pub fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryProfileRepository::new()), DEFAULT_LIMIT)
    }

    pub fn with_repository(repository: Arc<dyn ProfileRepository>, default_limit: usize) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Vec::new())),
            sessions: session_cache(DEFAULT_SESSION_IDLE),
            repository,
            default_limit,
        }
    }

    /// Replaces the idle timeout after which sessions are dropped
    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.sessions = session_cache(idle);
        self
    }

    /// Returns the user's session, loading the stored profile on first access
    ///
    /// Concurrent first requests for the same user share a single load.
    pub async fn session(&self, user_id: &str) -> Session {
        self.sessions
            .get_with(user_id.to_string(), async {
                let store = PreferenceStore::load(self.repository.as_ref(), user_id).await;
                tracing::info!(user_id, "Opened preference session");
                Arc::new(Mutex::new(store))
            })
            .await
    }

    /// Number of sessions currently held in memory
    pub async fn open_sessions(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }

    /// Inserts `item`, or replaces the item with the same id in place
    pub async fn upsert_item(&self, item: Item) {
        let mut catalog = self.catalog.write().await;
        if let Some(existing) = catalog.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            catalog.push(item);
        }
    }

    pub async fn find_item(&self, item_id: &str) -> Option<Item> {
        self.catalog
            .read()
            .await
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
    }
}

fn session_cache(idle: Duration) -> Cache<String, Session> {
    Cache::builder()
        .max_capacity(MAX_OPEN_SESSIONS)
        .time_to_idle(idle)
        .eviction_listener(|user_id, _session, cause| {
            tracing::debug!(user_id = %user_id, ?cause, "Closed preference session");
        })
        .build()
}
