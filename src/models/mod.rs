use serde::{Deserialize, Serialize};

pub mod category;

pub use category::Category;

/// Uniform movie summary rendered by every grid
///
/// Only `title` is guaranteed; everything else degrades gracefully when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieCard {
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full record for the details screen
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

// ============================================================================
// Recommendation bundle (GET /movie/search)
// ============================================================================

/// Text-similarity recommendation scored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfItem {
    pub title: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub tmdb: Option<MovieCard>,
}

/// Mood/topic-boosted recommendation scored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HybridItem {
    pub title: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub mood_match: bool,
    #[serde(default)]
    pub topic_match: bool,
    #[serde(default)]
    pub tmdb: Option<MovieCard>,
}

/// Aggregate response for a details page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationBundle {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub movie_details: MovieDetails,
    #[serde(default)]
    pub tfidf_recommendations: Vec<TfidfItem>,
    #[serde(default)]
    pub hybrid_recommendations: Vec<HybridItem>,
    #[serde(default)]
    pub genre_recommendations: Vec<MovieCard>,
}

/// List sizes requested for a recommendation bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BundleParams {
    pub tfidf_top_n: u32,
    pub hybrid_top_n: u32,
    pub genre_limit: u32,
}

impl Default for BundleParams {
    fn default() -> Self {
        Self {
            tfidf_top_n: 12,
            hybrid_top_n: 12,
            genre_limit: 12,
        }
    }
}

// ============================================================================
// Raw search results (GET /tmdb/search)
// ============================================================================

/// Search response passed through from the movie database proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}
