pub mod preference_store;
pub mod recommendations;
pub mod scorer;

pub use preference_store::PreferenceStore;
pub use recommendations::{Ranker, DEFAULT_LIMIT};
pub use scorer::{ScoreWeights, Scorer};
