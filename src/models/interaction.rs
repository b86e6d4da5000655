use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Kind of user interaction with an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Like,
    Comment,
    Share,
    /// Any kind the client sends that we don't know about
    #[serde(other)]
    Unknown,
}

impl InteractionKind {
    /// Affinity weight gained by one interaction of this kind
    pub fn weight(self) -> f64 {
        match self {
            InteractionKind::View => 0.1,
            InteractionKind::Like => 0.3,
            InteractionKind::Comment => 0.5,
            InteractionKind::Share => 0.7,
            InteractionKind::Unknown => 0.1,
        }
    }
}

impl Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::View => write!(f, "view"),
            InteractionKind::Like => write!(f, "like"),
            InteractionKind::Comment => write!(f, "comment"),
            InteractionKind::Share => write!(f, "share"),
            InteractionKind::Unknown => write!(f, "unknown"),
        }
    }
}
