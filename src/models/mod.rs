use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};
use uuid::Uuid;

use crate::error::AppError;

pub mod preferences;

pub use preferences::PreferenceList;

/// Opaque user identity supplied by the transport
pub type UserId = String;

/// Whole contents of the preference store, keyed by user
pub type PreferenceMap = BTreeMap<UserId, Vec<String>>;

/// Fixed set of content domains the similarity service is queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Music,
    Movies,
    Books,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Music, Category::Movies, Category::Books];

    /// Value sent as the `type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Music => "music",
            Category::Movies => "movies",
            Category::Books => "books",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AppError::InvalidCategory(s.trim().to_string()))
    }
}

/// Query sent to the similarity service, derived from a user's preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityQuery {
    pub term: String,
    pub category: Category,
}

impl SimilarityQuery {
    /// Joins preferences with `,` in stored order
    pub fn from_preferences(preferences: &[String], category: Category) -> Self {
        Self {
            term: preferences.join(","),
            category,
        }
    }
}

/// One suggestion returned by the similarity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl RecommendationItem {
    pub const NO_DESCRIPTION: &'static str = "No description available.";

    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(Self::NO_DESCRIPTION)
    }
}

/// Outcome of one recommendation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationResult {
    pub query: String,
    pub category: Category,
    pub items: Vec<RecommendationItem>,
}

impl RecommendationResult {
    /// True when the service answered but matched nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Identifies a pending clear confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearToken {
    pub id: Uuid,
    pub requested_at: DateTime<Utc>,
}

impl ClearToken {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            requested_at: Utc::now(),
        }
    }

    /// True once more than `ttl` has passed since the request
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.requested_at > ttl
    }
}

impl Default for ClearToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearDecision {
    Confirm,
    Cancel,
}

impl From<bool> for ClearDecision {
    fn from(confirm: bool) -> Self {
        if confirm {
            ClearDecision::Confirm
        } else {
            ClearDecision::Cancel
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SetOutcome {
    Added { text: String },
    AlreadyPresent { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClearOutcome {
    Cleared { removed: usize },
    NothingToClear,
    Cancelled,
}
