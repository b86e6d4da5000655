use serde::{Deserialize, Serialize};

pub mod interaction;
pub mod item;
pub mod profile;

pub use interaction::InteractionKind;
pub use item::{CategoryRef, Item, UNKNOWN_CATEGORY};
pub use profile::PreferenceProfile;

/// Relevance of one candidate item for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    pub item_id: String,
    /// Composite score in `0.0..=1.0`
    pub score: f64,
    /// Human-readable explanations, strongest signals first
    pub reasons: Vec<String>,
}
