pub mod profiles;

pub use profiles::create_redis_client;
pub use profiles::ProfileWriterHandle;
pub use profiles::RedisProfileRepository;
pub use profiles::StorageKey;
