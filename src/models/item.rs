use serde::{Deserialize, Serialize};

/// Category label used when an item's category cannot be resolved
pub const UNKNOWN_CATEGORY: &str = "Unbekannt";

/// Category reference as delivered by the catalog
///
/// Upstream sends either a plain name or an object carrying a `name` field.
/// Anything else is kept verbatim so the item round-trips, but resolves to
/// [`UNKNOWN_CATEGORY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    /// `"kategorie": "Traum"`
    PlainName(String),
    /// `"kategorie": { "name": "Traum" }`
    NamedRef { name: String },
    /// Any other JSON value
    Unrecognized(serde_json::Value),
}

impl CategoryRef {
    /// Resolves the category to a display name
    pub fn resolve(category: Option<&CategoryRef>) -> &str {
        match category {
            Some(CategoryRef::PlainName(name)) => name.as_str(),
            Some(CategoryRef::NamedRef { name }) => name.as_str(),
            Some(CategoryRef::Unrecognized(_)) | None => UNKNOWN_CATEGORY,
        }
    }
}

/// Wire representation of a catalog item
#[derive(Debug, Deserialize)]
struct RawItem {
    id: String,
    #[serde(default)]
    kategorie: Option<CategoryRef>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    ort: Option<String>,
    #[serde(default)]
    bewertungen: Option<f64>,
    #[serde(default)]
    kommentare: Vec<serde_json::Value>,
}

/// A shared experience from the catalog
///
/// The category name is resolved once on construction. Serialization writes
/// the original wire shape back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawItem")]
pub struct Item {
    pub id: String,
    #[serde(rename = "kategorie", skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    #[serde(skip)]
    category_name: String,
    pub tags: Vec<String>,
    #[serde(rename = "ort", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "bewertungen", skip_serializing_if = "Option::is_none")]
    pub likes: Option<f64>,
    #[serde(rename = "kommentare")]
    pub comments: Vec<serde_json::Value>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let category_name = CategoryRef::resolve(raw.kategorie.as_ref()).to_string();

        Self {
            id: raw.id,
            category: raw.kategorie,
            category_name,
            tags: raw.tags,
            location: raw.ort,
            likes: raw.bewertungen,
            comments: raw.kommentare,
        }
    }
}

impl Item {
    /// Creates an item with only an id and a category
    pub fn new(id: impl Into<String>, category: Option<CategoryRef>) -> Self {
        let category_name = CategoryRef::resolve(category.as_ref()).to_string();
        Self {
            id: id.into(),
            category,
            category_name,
            tags: Vec::new(),
            location: None,
            likes: None,
            comments: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_likes(mut self, likes: f64) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn with_comments(mut self, comments: Vec<serde_json::Value>) -> Self {
        self.comments = comments;
        self
    }

    /// Resolved category name, `"Unbekannt"` when unresolvable
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Likes/ratings count, 0 when absent
    pub fn like_count(&self) -> f64 {
        self.likes.unwrap_or(0.0)
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}
