use crate::db::ProfileRepository;
use crate::error::AppResult;
use crate::models::{InteractionKind, Item, PreferenceProfile};
use crate::services::recommendations::Ranker;

/// Share of the interaction weight credited to each tag of the item
const TAG_WEIGHT_FACTOR: f64 = 0.5;
/// Share of the interaction weight credited to the item's location
const LOCATION_WEIGHT_FACTOR: f64 = 0.3;

/// One user's preference profile and the operations that learn it
///
/// Constructed once per user session. Persistence is explicit: the host calls
/// [`PreferenceStore::load`] at session start and [`PreferenceStore::save`]
/// whenever it wants the profile written back.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    user_id: String,
    profile: PreferenceProfile,
}

impl PreferenceStore {
    /// Creates a store with an empty profile
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::from_profile(user_id, PreferenceProfile::new())
    }

    pub fn from_profile(user_id: impl Into<String>, profile: PreferenceProfile) -> Self {
        Self {
            user_id: user_id.into(),
            profile,
        }
    }

    /// Seeds a store from `repository`
    ///
    /// Never fails: a missing profile or a storage error both start the user
    /// with an empty profile.
    pub async fn load(repository: &dyn ProfileRepository, user_id: &str) -> Self {
        match repository.load_profile(user_id).await {
            Ok(Some(profile)) => {
                tracing::debug!(
                    user_id,
                    backend = repository.name(),
                    history_len = profile.interaction_history.len(),
                    "Loaded preference profile"
                );
                Self::from_profile(user_id, profile)
            }
            Ok(None) => {
                tracing::debug!(user_id, backend = repository.name(), "No stored profile, starting empty");
                Self::new(user_id)
            }
            Err(e) => {
                tracing::warn!(
                    user_id,
                    backend = repository.name(),
                    error = %e,
                    "Failed to load preference profile, starting empty"
                );
                Self::new(user_id)
            }
        }
    }

    /// Writes the current profile to `repository`
    pub async fn save(&self, repository: &dyn ProfileRepository) -> AppResult<()> {
        repository.save_profile(&self.user_id, &self.profile).await
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn profile(&self) -> &PreferenceProfile {
        &self.profile
    }

    /// Learns from one interaction of the user with `item`
    ///
    /// Weights accumulate on every call, while the item id enters the history
    /// only once.
    pub fn record_interaction(&mut self, kind: InteractionKind, item: &Item) {
        let weight = kind.weight();
        let profile = &mut self.profile;

        *profile
            .categories
            .entry(item.category_name().to_string())
            .or_insert(0.0) += weight;

        for tag in &item.tags {
            *profile.tags.entry(tag.clone()).or_insert(0.0) += weight * TAG_WEIGHT_FACTOR;
        }

        if let Some(location) = &item.location {
            *profile.locations.entry(location.clone()).or_insert(0.0) +=
                weight * LOCATION_WEIGHT_FACTOR;
        }

        profile.mark_seen(&item.id);
        profile.normalize();
        profile.truncate_history();

        tracing::debug!(
            user_id = %self.user_id,
            item_id = %item.id,
            kind = %kind,
            weight,
            "Recorded interaction"
        );
    }

    /// Top `limit` unseen items of `catalog` for this user
    pub fn recommend<'c>(&self, catalog: &'c [Item], own_items: &[Item], limit: usize) -> Vec<&'c Item> {
        Ranker::new(&self.profile).recommend(catalog, own_items, limit)
    }
}
