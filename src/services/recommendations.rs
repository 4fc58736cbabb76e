use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Category, RecommendationResult, SimilarityQuery},
    services::{preferences::PreferenceManager, providers::SimilarityProvider},
};

/// Builds a similarity query from a user's stored preferences and asks the
/// configured provider for suggestions.
pub struct Recommender {
    preferences: Arc<PreferenceManager>,
    provider: Arc<dyn SimilarityProvider>,
}

impl Recommender {
    pub fn new(preferences: Arc<PreferenceManager>, provider: Arc<dyn SimilarityProvider>) -> Self {
        Self {
            preferences,
            provider,
        }
    }

    /// Validates `category`, then queries with every stored preference
    ///
    /// The category is checked before the store is read, so an invalid one
    /// never reaches the provider. The store lock is not held during the
    /// provider call.
    pub async fn recommend(&self, user_id: &str, category: &str) -> AppResult<RecommendationResult> {
        let category: Category = category.parse()?;

        let preferences = self.preferences.list_preferences(user_id).await;
        if preferences.is_empty() {
            return Err(AppError::NoPreferences);
        }

        let query = SimilarityQuery::from_preferences(&preferences, category);

        tracing::info!(
            user_id = %user_id,
            category = %category,
            preferences = preferences.len(),
            provider = self.provider.name(),
            "Requesting recommendations"
        );

        let items = self.provider.similar(&query).await.map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "Recommendation lookup failed");
            e
        })?;

        Ok(RecommendationResult {
            query: query.term,
            category,
            items,
        })
    }
}
