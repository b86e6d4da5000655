use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of item ids kept in the interaction history
pub const MAX_HISTORY: usize = 1000;
/// Cap on the largest category weight after normalization
pub const MAX_CATEGORY_WEIGHT: f64 = 10.0;
/// Cap on the largest tag weight after normalization
pub const MAX_TAG_WEIGHT: f64 = 5.0;

/// Accumulated affinity weights for one user
///
/// Serialized as plain JSON so any storage backend can hold it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    /// Category name -> weight
    #[serde(default)]
    pub categories: HashMap<String, f64>,
    /// Tag -> weight
    #[serde(default)]
    pub tags: HashMap<String, f64>,
    /// Location label -> weight
    #[serde(default)]
    pub locations: HashMap<String, f64>,
    /// Reserved, not written or read by scoring
    #[serde(default)]
    pub time_of_day: HashMap<String, f64>,
    /// Ids of items the user already interacted with, oldest first
    #[serde(default)]
    pub interaction_history: Vec<String>,
}

impl PreferenceProfile {
    /// Creates an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_weight(&self, category: &str) -> f64 {
        self.categories.get(category).copied().unwrap_or(0.0)
    }

    pub fn tag_weight(&self, tag: &str) -> f64 {
        self.tags.get(tag).copied().unwrap_or(0.0)
    }

    pub fn location_weight(&self, location: &str) -> f64 {
        self.locations.get(location).copied().unwrap_or(0.0)
    }

    pub fn has_seen(&self, item_id: &str) -> bool {
        self.interaction_history.iter().any(|id| id == item_id)
    }

    /// Appends an id to the history unless it is already there
    pub(crate) fn mark_seen(&mut self, item_id: &str) {
        if !self.has_seen(item_id) {
            self.interaction_history.push(item_id.to_string());
        }
    }

    /// Rescales category and tag weights so they stay under their caps
    pub(crate) fn normalize(&mut self) {
        rescale(&mut self.categories, MAX_CATEGORY_WEIGHT);
        rescale(&mut self.tags, MAX_TAG_WEIGHT);
    }

    /// Drops the oldest history entries beyond [`MAX_HISTORY`]
    pub(crate) fn truncate_history(&mut self) {
        let len = self.interaction_history.len();
        if len > MAX_HISTORY {
            self.interaction_history.drain(..len - MAX_HISTORY);
        }
    }
}

/// Proportionally scales every weight in `weights` so the largest equals `cap`
fn rescale(weights: &mut HashMap<String, f64>, cap: f64) {
    let max = weights.values().copied().fold(0.0_f64, f64::max);
    if max > cap {
        // divide first so the largest entry lands exactly on the cap
        for weight in weights.values_mut() {
            *weight = *weight / max * cap;
        }
    }
}
