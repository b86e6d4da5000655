//! Property-based checks for scoring and preference learning.
//!
//! Profiles and items are drawn from small vocabularies so categories, tags
//! and locations overlap often, with weights and like counts that include
//! negative and non-finite values.

use std::collections::HashSet;

use proptest::{
    collection::{hash_map, vec},
    option,
    prelude::{prop_assert, prop_assert_eq, prop_oneof, Just, Strategy},
    proptest,
    sample::select,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};
use xpshare_recs::models::profile::{MAX_CATEGORY_WEIGHT, MAX_HISTORY, MAX_TAG_WEIGHT};
use xpshare_recs::models::CategoryRef;
use xpshare_recs::services::scorer::similarity;
use xpshare_recs::{InteractionKind, Item, PreferenceProfile, PreferenceStore, Scorer};

const SCORE_PROP_CASES: u32 = 256;
const SCORE_PROP_MAX_SHRINK_ITERS: u32 = 1024;

const CATEGORIES: &[&str] = &["Traum", "Sport", "Reise", "Meditation"];
const TAGS: &[&str] = &["Klartraum", "Schweben", "Berge", "Meer", "Yoga", "Stille"];
const LOCATIONS: &[&str] = &["Berlin", "Alpen", "Hamburg"];
const KINDS: &[InteractionKind] = &[
    InteractionKind::View,
    InteractionKind::Like,
    InteractionKind::Comment,
    InteractionKind::Share,
    InteractionKind::Unknown,
];

fn score_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: SCORE_PROP_CASES,
        max_shrink_iters: SCORE_PROP_MAX_SHRINK_ITERS,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "score-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn word(vocabulary: &'static [&'static str]) -> impl Strategy<Value = String> {
    select(vocabulary).prop_map(String::from)
}

fn weight_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -10.0..50.0f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

fn likes_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -100.0..10_000.0f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn profile_strategy() -> impl Strategy<Value = PreferenceProfile> {
    (
        hash_map(word(CATEGORIES), weight_strategy(), 0..4),
        hash_map(word(TAGS), weight_strategy(), 0..6),
        hash_map(word(LOCATIONS), weight_strategy(), 0..3),
    )
        .prop_map(|(categories, tags, locations)| PreferenceProfile {
            categories,
            tags,
            locations,
            ..PreferenceProfile::default()
        })
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (
        0u8..16,
        option::of(word(CATEGORIES)),
        vec(word(TAGS), 0..4),
        option::of(word(LOCATIONS)),
        option::of(likes_strategy()),
        0usize..40,
    )
        .prop_map(|(id, category, tags, location, likes, comments)| {
            let mut item = Item::new(format!("item-{}", id), category.map(CategoryRef::PlainName))
                .with_tags(tags)
                .with_comments(vec![serde_json::Value::Null; comments]);
            if let Some(location) = location {
                item = item.with_location(location);
            }
            if let Some(likes) = likes {
                item = item.with_likes(likes);
            }
            item
        })
}

proptest! {
    #![proptest_config(score_proptest_config())]

    #[test]
    fn test_score_stays_within_unit_interval(
        profile in profile_strategy(),
        candidate in item_strategy(),
        own_items in vec(item_strategy(), 0..4),
    ) {
        let scored = Scorer::new(&profile).score(&candidate, &own_items);
        prop_assert!(
            scored.score.is_finite() && (0.0..=1.0).contains(&scored.score),
            "score out of range: {} for {:?}",
            scored.score,
            candidate
        );
    }

    #[test]
    fn test_similarity_is_bounded_and_symmetric(a in item_strategy(), b in item_strategy()) {
        let forward = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&forward), "similarity out of range: {}", forward);
        prop_assert_eq!(forward, similarity(&b, &a));
    }

    #[test]
    fn test_learned_profile_respects_caps(
        interactions in vec((select(KINDS), item_strategy()), 0..80),
        candidate in item_strategy(),
    ) {
        let mut store = PreferenceStore::new("user-1");
        for (kind, item) in &interactions {
            store.record_interaction(*kind, item);
        }
        let profile = store.profile();

        prop_assert!(profile.categories.values().all(|w| *w <= MAX_CATEGORY_WEIGHT));
        prop_assert!(profile.tags.values().all(|w| *w <= MAX_TAG_WEIGHT));

        let history = &profile.interaction_history;
        prop_assert!(history.len() <= MAX_HISTORY);
        prop_assert_eq!(history.iter().collect::<HashSet<_>>().len(), history.len());

        let score = Scorer::new(profile).score(&candidate, &[]).score;
        prop_assert!((0.0..=1.0).contains(&score), "score out of range: {}", score);
    }
}
