/// CineSuggest backend provider
///
/// Talks to the recommendation/metadata API over plain HTTP GETs:
///
/// 1. Category feed: /home?category=&limit=
/// 2. Title search: /tmdb/search?query=
/// 3. Details: /movie/id/{id}
/// 4. Recommendation bundle: /movie/search?query=&tfidf_top_n=&hybrid_top_n=&genre_limit=
///
/// Every response is cached under a key built from its query parameters.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{BundleParams, Category, MovieCard, MovieDetails, RecommendationBundle, SearchPage},
    services::providers::MovieApi,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

#[derive(Clone)]
pub struct BackendClient {
    http_client: HttpClient,
    base_url: String,
    cache: Cache,
    cache_ttl: u64,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        cache: Cache,
        cache_ttl: u64,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::info!(
            base_url = %base_url,
            cache = cache.backend_name(),
            cache_ttl,
            "Backend client configured"
        );

        Ok(Self {
            http_client,
            base_url,
            cache,
            cache_ttl,
        })
    }

    /// Issues a GET and decodes the JSON body, mapping non-2xx responses to errors
    #[instrument(skip(self, query), fields(base_url = %self.base_url))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                body = %body,
                "Backend request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Backend returned status {}: {}",
                status.as_u16(),
                error_detail(&body, status.canonical_reason().unwrap_or("Unknown error"))
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, response = %response_text, "Failed to deserialize backend response");
            AppError::ExternalApi(format!("Failed to parse backend response: {}", e))
        })
    }
}

/// Extracts the human-readable message from an error body
///
/// The backend reports failures as `{"detail": ...}`; anything else is passed
/// through as text, and an empty body falls back to `fallback`.
fn error_detail(body: &str, fallback: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return fallback.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

#[async_trait::async_trait]
impl MovieApi for BackendClient {
    async fn home_feed(&self, category: Category, limit: u32) -> AppResult<Vec<MovieCard>> {
        let key = CacheKey::HomeFeed { category, limit };

        cached!(self.cache, key, self.cache_ttl, async move {
            let cards: Vec<MovieCard> = self
                .get_json(
                    "/home",
                    &[
                        ("category", category.as_str().to_string()),
                        ("limit", limit.to_string()),
                    ],
                )
                .await?;

            tracing::info!(
                category = %category,
                results = cards.len(),
                provider = self.name(),
                "Home feed fetched"
            );

            Ok::<_, AppError>(cards)
        })
    }

    async fn search(&self, query: &str) -> AppResult<SearchPage> {
        let key = CacheKey::Search(query.to_string());

        cached!(self.cache, key, self.cache_ttl, async move {
            let page: SearchPage = self
                .get_json("/tmdb/search", &[("query", query.to_string())])
                .await?;

            tracing::info!(
                query = %query,
                results = page.results.len(),
                provider = self.name(),
                "Title search completed"
            );

            Ok::<_, AppError>(page)
        })
    }

    async fn movie_details(&self, tmdb_id: u64) -> AppResult<MovieDetails> {
        let key = CacheKey::Details(tmdb_id);

        cached!(self.cache, key, self.cache_ttl, async move {
            let details: MovieDetails = self
                .get_json(&format!("/movie/id/{}", tmdb_id), &[])
                .await?;

            tracing::info!(
                tmdb_id,
                title = %details.title,
                provider = self.name(),
                "Movie details fetched"
            );

            Ok::<_, AppError>(details)
        })
    }

    async fn recommendations(
        &self,
        query: &str,
        params: BundleParams,
    ) -> AppResult<RecommendationBundle> {
        let key = CacheKey::Bundle {
            query: query.to_string(),
            params,
        };

        cached!(self.cache, key, self.cache_ttl, async move {
            let bundle: RecommendationBundle = self
                .get_json(
                    "/movie/search",
                    &[
                        ("query", query.to_string()),
                        ("tfidf_top_n", params.tfidf_top_n.to_string()),
                        ("hybrid_top_n", params.hybrid_top_n.to_string()),
                        ("genre_limit", params.genre_limit.to_string()),
                    ],
                )
                .await?;

            tracing::info!(
                query = %query,
                tfidf = bundle.tfidf_recommendations.len(),
                hybrid = bundle.hybrid_recommendations.len(),
                genre = bundle.genre_recommendations.len(),
                provider = self.name(),
                "Recommendation bundle fetched"
            );

            Ok::<_, AppError>(bundle)
        })
    }

    fn name(&self) -> &'static str {
        "cinesuggest-backend"
    }
}
