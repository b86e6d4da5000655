use std::collections::HashSet;

use crate::models::{Item, PreferenceProfile, ScoredItem};

/// Weights of the sub-scores in the composite score
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub category: f64,
    pub tags: f64,
    pub location: f64,
    pub self_similarity: f64,
    pub popularity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category: 0.30,
            tags: 0.25,
            location: 0.20,
            self_similarity: 0.15,
            popularity: 0.10,
        }
    }
}

const CATEGORY_REASON_THRESHOLD: f64 = 0.5;
const TAG_REASON_THRESHOLD: f64 = 0.4;
const LOCATION_REASON_THRESHOLD: f64 = 0.3;
const SIMILARITY_REASON_THRESHOLD: f64 = 0.4;
const POPULARITY_REASON_THRESHOLD: f64 = 0.7;

const LIKES_SATURATION: f64 = 100.0;
const COMMENTS_SATURATION: f64 = 20.0;

// Pairwise similarity blend
const SIMILARITY_CATEGORY_WEIGHT: f64 = 0.4;
const SIMILARITY_TAG_WEIGHT: f64 = 0.3;
const SIMILARITY_LOCATION_WEIGHT: f64 = 0.3;

/// Scores candidate items against a user's preference profile
pub struct Scorer<'a> {
    profile: &'a PreferenceProfile,
    weights: ScoreWeights,
}

impl<'a> Scorer<'a> {
    /// Creates a scorer with the default weights
    pub fn new(profile: &'a PreferenceProfile) -> Self {
        Self::with_weights(profile, ScoreWeights::default())
    }

    pub fn with_weights(profile: &'a PreferenceProfile, weights: ScoreWeights) -> Self {
        Self { profile, weights }
    }

    /// Computes the composite score of `item` for this profile
    ///
    /// `own_items` are the experiences the user authored; the closest one
    /// drives the self-similarity signal. Missing attributes contribute 0.
    pub fn score(&self, item: &Item, own_items: &[Item]) -> ScoredItem {
        let mut reasons = Vec::new();

        let category = unit(self.profile.category_weight(item.category_name()));
        if category > CATEGORY_REASON_THRESHOLD {
            reasons.push(format!("Beliebte Kategorie: {}", item.category_name()));
        }

        let (best_tag, tags) = self.tag_affinity(item);
        if let Some(tag) = best_tag.filter(|_| tags > TAG_REASON_THRESHOLD) {
            reasons.push(format!("Ähnliche Interessen: {}", tag));
        }

        let location = unit(
            item.location
                .as_deref()
                .map(|loc| self.profile.location_weight(loc))
                .unwrap_or(0.0),
        );
        if location > LOCATION_REASON_THRESHOLD {
            if let Some(loc) = &item.location {
                reasons.push(format!("Beliebter Standort: {}", loc));
            }
        }

        let self_similarity = unit(
            own_items
                .iter()
                .map(|own| similarity(item, own))
                .fold(0.0, f64::max),
        );
        if self_similarity > SIMILARITY_REASON_THRESHOLD {
            reasons.push("Ähnlich zu deinen eigenen Erlebnissen".to_string());
        }

        let popularity = popularity(item);
        if popularity > POPULARITY_REASON_THRESHOLD {
            reasons.push("Sehr beliebt in der Community".to_string());
        }

        let total = category * self.weights.category
            + tags * self.weights.tags
            + location * self.weights.location
            + self_similarity * self.weights.self_similarity
            + popularity * self.weights.popularity;

        ScoredItem {
            item_id: item.id.clone(),
            score: total.min(1.0),
            reasons,
        }
    }

    /// Highest tag weight among the item's tags, with the tag that produced it
    fn tag_affinity<'i>(&self, item: &'i Item) -> (Option<&'i str>, f64) {
        item.tags
            .iter()
            .map(|tag| (Some(tag.as_str()), unit(self.profile.tag_weight(tag))))
            .fold((None, 0.0), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            })
    }
}

/// Community popularity in `0.0..=1.0`
pub fn popularity(item: &Item) -> f64 {
    let likes = unit(item.like_count() / LIKES_SATURATION);
    let comments = (item.comment_count() as f64).min(COMMENTS_SATURATION) / COMMENTS_SATURATION;
    (likes + comments) / 2.0
}

/// Content similarity of two items in `0.0..=1.0`
///
/// Blends category match, tag overlap and location match, normalized by the
/// weights of the signals that apply to this pair.
pub fn similarity(a: &Item, b: &Item) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    if a.category_name() == b.category_name() {
        numerator += SIMILARITY_CATEGORY_WEIGHT;
        denominator += SIMILARITY_CATEGORY_WEIGHT;
    }

    if !a.tags.is_empty() && !b.tags.is_empty() {
        let tags_a: HashSet<&str> = a.tags.iter().map(String::as_str).collect();
        let tags_b: HashSet<&str> = b.tags.iter().map(String::as_str).collect();
        let shared = tags_a.intersection(&tags_b).count() as f64;
        let larger = tags_a.len().max(tags_b.len()) as f64;

        numerator += shared / larger * SIMILARITY_TAG_WEIGHT;
        denominator += SIMILARITY_TAG_WEIGHT;
    }

    if let (Some(loc_a), Some(loc_b)) = (&a.location, &b.location) {
        if loc_a == loc_b {
            numerator += SIMILARITY_LOCATION_WEIGHT;
            denominator += SIMILARITY_LOCATION_WEIGHT;
        }
    }

    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Clamps a sub-score to `0.0..=1.0`
fn unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
