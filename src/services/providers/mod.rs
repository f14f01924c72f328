/// Movie data provider abstraction
///
/// Every screen is built from four read-only calls against the recommendation
/// backend. Handlers and the discovery service depend on this trait so the
/// HTTP client can be swapped for a mock in tests.
use crate::{
    error::AppResult,
    models::{BundleParams, Category, MovieCard, MovieDetails, RecommendationBundle, SearchPage},
};

pub mod backend;

pub use backend::BackendClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieApi: Send + Sync {
    /// Fetch a category feed, already card-shaped by the backend
    async fn home_feed(&self, category: Category, limit: u32) -> AppResult<Vec<MovieCard>>;

    /// Free-text title search, returned in the raw movie database shape
    async fn search(&self, query: &str) -> AppResult<SearchPage>;

    /// Fetch the detail record for one movie
    async fn movie_details(&self, tmdb_id: u64) -> AppResult<MovieDetails>;

    /// Fetch the recommendation bundle keyed by a title (or any search string)
    async fn recommendations(
        &self,
        query: &str,
        params: BundleParams,
    ) -> AppResult<RecommendationBundle>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
