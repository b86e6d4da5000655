use serde::Deserialize;

/// Where preference profiles are persisted
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Profile storage backend
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// Redis connection URL, used by the redis backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Seconds a stored profile survives without being saved again
    #[serde(default = "default_profile_ttl_secs")]
    pub profile_ttl_secs: u64,

    /// Recommendations returned when a request has no limit
    #[serde(default = "default_recommendation_limit")]
    pub default_recommendation_limit: usize,

    /// Seconds an untouched session stays in memory
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Memory
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_profile_ttl_secs() -> u64 {
    2_592_000 // 30 days
}

fn default_recommendation_limit() -> usize {
    crate::services::DEFAULT_LIMIT
}

fn default_session_idle_secs() -> u64 {
    1_800 // 30 minutes
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_backend: default_storage_backend(),
            redis_url: default_redis_url(),
            profile_ttl_secs: default_profile_ttl_secs(),
            default_recommendation_limit: default_recommendation_limit(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.default_recommendation_limit == 0 {
            anyhow::bail!("DEFAULT_RECOMMENDATION_LIMIT must be positive");
        }
        if config.session_idle_secs == 0 {
            anyhow::bail!("SESSION_IDLE_SECS must be positive");
        }

        Ok(config)
    }
}
