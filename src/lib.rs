pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use models::{InteractionKind, Item, PreferenceProfile, ScoredItem};
pub use services::{PreferenceStore, Ranker, Scorer};
