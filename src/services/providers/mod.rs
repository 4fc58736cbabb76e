/// Similarity service abstraction
///
/// The recommendation pipeline only needs "give me items similar to this
/// query term in this category". Keeping that behind a trait lets tests swap
/// in a mock and leaves room for a second upstream.
use crate::{
    error::AppResult,
    models::{RecommendationItem, SimilarityQuery},
};

pub mod tastedive;

pub use tastedive::TasteDiveProvider;

/// Number of suggestions requested per query
pub const RESULT_LIMIT: u32 = 5;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SimilarityProvider: Send + Sync {
    /// Fetch items similar to `query.term` within `query.category`
    ///
    /// An empty vector means the service answered and matched nothing.
    async fn similar(&self, query: &SimilarityQuery) -> AppResult<Vec<RecommendationItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
