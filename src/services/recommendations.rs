use std::collections::HashSet;

use crate::models::{Item, PreferenceProfile, ScoredItem};
use crate::services::scorer::Scorer;

/// Number of recommendations returned when the caller does not specify one
pub const DEFAULT_LIMIT: usize = 10;

/// Ranks unseen catalog items for one user
///
/// Items the user already interacted with are excluded, the rest are scored
/// and sorted by descending score. Ties keep their catalog order.
pub struct Ranker<'a> {
    profile: &'a PreferenceProfile,
    scorer: Scorer<'a>,
}

impl<'a> Ranker<'a> {
    pub fn new(profile: &'a PreferenceProfile) -> Self {
        Self {
            profile,
            scorer: Scorer::new(profile),
        }
    }

    /// Returns up to `limit` unseen items from `catalog`, best first
    pub fn recommend<'c>(
        &self,
        catalog: &'c [Item],
        own_items: &[Item],
        limit: usize,
    ) -> Vec<&'c Item> {
        let ranked = self.rank(catalog, own_items, limit);

        for (item, scored) in &ranked {
            tracing::debug!(
                item_id = %item.id,
                score = scored.score,
                reasons = ?scored.reasons,
                "Recommending item"
            );
        }

        ranked.into_iter().map(|(item, _)| item).collect()
    }

    /// Like [`Ranker::recommend`], but returns the score records
    pub fn explain(&self, catalog: &[Item], own_items: &[Item], limit: usize) -> Vec<ScoredItem> {
        self.rank(catalog, own_items, limit)
            .into_iter()
            .map(|(_, scored)| scored)
            .collect()
    }

    fn rank<'c>(
        &self,
        catalog: &'c [Item],
        own_items: &[Item],
        limit: usize,
    ) -> Vec<(&'c Item, ScoredItem)> {
        let seen: HashSet<&str> = self
            .profile
            .interaction_history
            .iter()
            .map(String::as_str)
            .collect();

        let mut scored: Vec<(&Item, ScoredItem)> = catalog
            .iter()
            .filter(|item| !seen.contains(item.id.as_str()))
            .map(|item| (item, self.scorer.score(item, own_items)))
            .collect();

        // sort_by is stable, equal scores keep catalog order
        scored.sort_by(|(_, a), (_, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let eligible = scored.len();
        scored.truncate(limit);

        tracing::debug!(
            catalog_size = catalog.len(),
            excluded = catalog.len() - eligible,
            returned = scored.len(),
            "Ranked catalog"
        );

        scored
    }
}
