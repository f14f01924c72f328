use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;

use cinesuggest_web::{
    api::{create_router, AppState},
    error::{AppError, AppResult},
    models::{
        BundleParams, Category, HybridItem, MovieCard, MovieDetails, RecommendationBundle,
        SearchPage, SearchResult, TfidfItem,
    },
    services::{DiscoverySettings, MovieApi},
};

/// In-memory provider that records every call it receives
#[derive(Default)]
struct StubApi {
    feeds: HashMap<Category, Vec<MovieCard>>,
    search_results: Vec<SearchResult>,
    search_delay: Option<Duration>,
    details: Option<MovieDetails>,
    bundle: Option<RecommendationBundle>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MovieApi for StubApi {
    async fn home_feed(&self, category: Category, limit: u32) -> AppResult<Vec<MovieCard>> {
        self.record(format!("home:{}:{}", category, limit));
        self.feeds
            .get(&category)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi("Backend returned status 502: feed down".to_string()))
    }

    async fn search(&self, query: &str) -> AppResult<SearchPage> {
        self.record(format!("search:{}", query));
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(SearchPage {
            results: self
                .search_results
                .iter()
                .filter(|r| r.title.to_lowercase().contains(&query.to_lowercase()))
                .cloned()
                .collect(),
        })
    }

    async fn movie_details(&self, tmdb_id: u64) -> AppResult<MovieDetails> {
        self.record(format!("details:{}", tmdb_id));
        self.details
            .clone()
            .ok_or_else(|| AppError::ExternalApi("Backend returned status 404: Not Found".to_string()))
    }

    async fn recommendations(
        &self,
        query: &str,
        params: BundleParams,
    ) -> AppResult<RecommendationBundle> {
        self.record(format!("bundle:{}:{}", query, params.tfidf_top_n));
        self.bundle.clone().ok_or_else(|| {
            AppError::ExternalApi("Backend returned status 404: Movie not found in TMDB".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn card(id: u64, title: &str) -> MovieCard {
    MovieCard {
        tmdb_id: Some(id),
        title: title.to_string(),
        poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", id)),
        ..Default::default()
    }
}

fn search_result(id: u64, title: &str, poster_path: Option<&str>) -> SearchResult {
    SearchResult {
        id,
        title: title.to_string(),
        poster_path: poster_path.map(str::to_string),
        release_date: None,
        vote_average: None,
    }
}

fn inception() -> MovieDetails {
    MovieDetails {
        tmdb_id: Some(27205),
        title: "Inception".to_string(),
        overview: Some("Cobb steals secrets from dreams.".to_string()),
        release_date: Some("2010-07-15".to_string()),
        ..Default::default()
    }
}

fn create_test_server(api: Arc<StubApi>, settings: DiscoverySettings) -> TestServer {
    let state = AppState::new(api, settings);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn link_count(html: &str) -> usize {
    html.matches(r#"href="/details/"#).count()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("edge-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "edge-42");
}

#[tokio::test]
async fn test_popular_feed_renders_one_link_per_card() {
    let cards: Vec<MovieCard> = (1..=20).map(|i| card(i, &format!("Popular {}", i))).collect();
    let api = Arc::new(StubApi {
        feeds: HashMap::from([(Category::Popular, cards)]),
        ..Default::default()
    });
    let settings = DiscoverySettings {
        home_limit: 20,
        ..Default::default()
    };
    let server = create_test_server(api.clone(), settings);

    let response = server.get("/").add_query_param("category", "popular").await;
    response.assert_status_ok();

    let html = response.text();
    assert_eq!(link_count(&html), 20);
    for i in 1..=20 {
        assert!(html.contains(&format!(r#"href="/details/{}""#, i)));
    }
    assert_eq!(api.calls(), vec!["home:popular:20"]);
}

#[tokio::test]
async fn test_default_category_is_trending() {
    let api = Arc::new(StubApi {
        feeds: HashMap::from([(Category::Trending, vec![card(1, "Hot")])]),
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let html = server.get("/").await.text();
    assert!(html.contains("<h3>TRENDING</h3>"));
    assert_eq!(api.calls(), vec!["home:trending:24"]);
}

#[tokio::test]
async fn test_category_switch_replaces_cards() {
    let api = Arc::new(StubApi {
        feeds: HashMap::from([
            (Category::Popular, vec![card(1, "Old Favourite"), card(2, "Crowd Pleaser")]),
            (Category::Upcoming, vec![card(3, "Next Summer")]),
        ]),
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let first = server.get("/").add_query_param("category", "popular").await.text();
    assert_eq!(link_count(&first), 2);

    let second = server.get("/").add_query_param("category", "upcoming").await.text();
    assert_eq!(link_count(&second), 1);
    assert!(second.contains("Next Summer"));
    assert!(!second.contains("Old Favourite"));
    assert!(!second.contains("Crowd Pleaser"));
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());
    let response = server.get("/").add_query_param("category", "cult").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Unknown category"));
}

#[tokio::test]
async fn test_empty_feed_shows_message_and_no_links() {
    let api = Arc::new(StubApi {
        feeds: HashMap::from([(Category::TopRated, vec![])]),
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let html = server.get("/").add_query_param("category", "top_rated").await.text();
    assert!(html.contains("No movies found."));
    assert_eq!(link_count(&html), 0);
}

#[tokio::test]
async fn test_feed_failure_renders_inline_error() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());

    let response = server.get("/").add_query_param("category", "now_playing").await;
    response.assert_status_ok();
    assert!(response
        .text()
        .contains("Error: External API error: Backend returned status 502: feed down"));
}

#[tokio::test]
async fn test_short_query_issues_no_request() {
    let api = Arc::new(StubApi::default());
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let response = server.get("/search").add_query_param("query", "a").await;
    response.assert_status_ok();
    assert!(response.text().contains("Type at least 2 characters"));

    let response = server.get("/").add_query_param("query", "a").await;
    response.assert_status_ok();

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_search_without_poster_renders_placeholder() {
    let api = Arc::new(StubApi {
        search_results: vec![
            search_result(348, "Alien", Some("/alien.jpg")),
            search_result(679, "Aliens", None),
        ],
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let html = server.get("/search").add_query_param("query", "alien").await.text();
    assert_eq!(link_count(&html), 2);
    assert_eq!(html.matches("<img").count(), 1);
    assert!(html.contains(r#"src="https://image.tmdb.org/t/p/w500/alien.jpg""#));
    assert!(html.contains("No Image"));
}

#[tokio::test]
async fn test_home_query_shows_search_results() {
    let api = Arc::new(StubApi {
        search_results: vec![search_result(603, "The Matrix", None)],
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let html = server.get("/").add_query_param("query", "matrix").await.text();
    assert!(html.contains("Search Results"));
    assert!(html.contains(r#"href="/details/603""#));
    assert_eq!(api.calls(), vec!["search:matrix"]);
}

#[tokio::test]
async fn test_details_render_when_recommendations_fail() {
    let api = Arc::new(StubApi {
        details: Some(inception()),
        bundle: None,
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let response = server.get("/details/27205").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("<h1>Inception</h1>"));
    assert!(html.contains("Cobb steals secrets from dreams."));
    assert_eq!(
        html.matches("Error: External API error: Backend returned status 404: Movie not found in TMDB")
            .count(),
        5
    );
    assert_eq!(api.calls(), vec!["details:27205", "bundle:Inception:12"]);
}

#[tokio::test]
async fn test_details_with_recommendation_groups() {
    let bundle = RecommendationBundle {
        query: "Inception".to_string(),
        movie_details: inception(),
        tfidf_recommendations: vec![TfidfItem {
            title: "Interstellar".to_string(),
            score: 0.41,
            tmdb: Some(card(157336, "Interstellar")),
        }],
        hybrid_recommendations: vec![HybridItem {
            title: "Tenet".to_string(),
            score: 0.52,
            mood_match: true,
            topic_match: false,
            tmdb: Some(card(577922, "Tenet")),
        }],
        genre_recommendations: vec![card(603, "The Matrix")],
    };
    let api = Arc::new(StubApi {
        details: Some(inception()),
        bundle: Some(bundle),
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let html = server.get("/details/27205").await.text();
    for heading in [
        "TF-IDF Similar",
        "Hybrid (Mood + Topic)",
        "Same Genre",
        "Similar Mood",
        "Similar Topic",
    ] {
        assert!(html.contains(&format!("<h3>{}</h3>", heading)), "missing {}", heading);
    }
    // Tenet appears in both the hybrid and mood groups; topic group is empty.
    assert_eq!(html.matches(r#"href="/details/577922""#).count(), 2);
    assert_eq!(link_count(&html), 4);
    assert!(html.contains("No movies found."));
}

#[tokio::test]
async fn test_details_failure_renders_error_page() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());

    let response = server.get("/details/1").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(response.text().contains("Backend returned status 404: Not Found"));
}

#[tokio::test]
async fn test_details_by_title_uses_bundle() {
    let api = Arc::new(StubApi {
        bundle: Some(RecommendationBundle {
            query: "inception".to_string(),
            movie_details: inception(),
            ..Default::default()
        }),
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let response = server.get("/details/inception").await;
    response.assert_status_ok();
    assert!(response.text().contains("<h1>Inception</h1>"));
    assert_eq!(api.calls(), vec!["bundle:inception:12"]);
}

#[tokio::test]
async fn test_numeric_title_via_query() {
    let api = Arc::new(StubApi {
        bundle: Some(RecommendationBundle {
            query: "1917".to_string(),
            movie_details: MovieDetails {
                tmdb_id: Some(530915),
                title: "1917".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }),
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let response = server.get("/details").add_query_param("title", "1917").await;
    response.assert_status_ok();
    assert!(response.text().contains("<h1>1917</h1>"));
    assert_eq!(api.calls(), vec!["bundle:1917:12"]);
}

#[tokio::test]
async fn test_blank_title_query_is_rejected() {
    let api = Arc::new(StubApi::default());
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let response = server.get("/details").add_query_param("title", " ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_empty_details_record_is_not_found() {
    let api = Arc::new(StubApi {
        details: Some(MovieDetails::default()),
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let response = server.get("/details/42").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("No movie with id 42"));
    assert_eq!(api.calls(), vec!["details:42"]);
}

#[tokio::test]
async fn test_legacy_movie_route_redirects() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());

    let response = server.get("/movie/27205").await;
    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "/details/27205");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = create_test_server(Arc::new(StubApi::default()), DiscoverySettings::default());

    let response = server.get("/does/not/exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Page not found"));
}

#[tokio::test]
async fn test_search_fragment_without_client_key() {
    let api = Arc::new(StubApi {
        search_results: vec![search_result(348, "Alien", None)],
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let response = server
        .get("/fragments/search")
        .add_query_param("query", "alien")
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(!html.contains("<html"));
    assert_eq!(link_count(&html), 1);
}

#[tokio::test]
async fn test_search_fragment_refuses_stale_generation() {
    let api = Arc::new(StubApi {
        search_results: vec![search_result(348, "Alien", None)],
        ..Default::default()
    });
    let server = create_test_server(api.clone(), DiscoverySettings::default());

    let fresh = server
        .get("/fragments/search")
        .add_query_param("query", "alien")
        .add_query_param("sid", "tab-1")
        .add_query_param("gen", "5")
        .await;
    fresh.assert_status_ok();

    let stale = server
        .get("/fragments/search")
        .add_query_param("query", "ali")
        .add_query_param("sid", "tab-1")
        .add_query_param("gen", "4")
        .await;
    stale.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(api.calls(), vec!["search:alien"]);
}

#[tokio::test]
async fn test_search_fragment_superseded_in_flight() {
    let api = Arc::new(StubApi {
        search_results: vec![search_result(348, "Alien", None)],
        search_delay: Some(Duration::from_millis(300)),
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let slow = async {
        server
            .get("/fragments/search")
            .add_query_param("query", "al")
            .add_query_param("sid", "tab-2")
            .add_query_param("gen", "1")
            .await
    };
    let newer = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        server
            .get("/fragments/search")
            .add_query_param("query", "alien")
            .add_query_param("sid", "tab-2")
            .add_query_param("gen", "2")
            .await
    };

    let (slow, newer) = tokio::join!(slow, newer);
    slow.assert_status(StatusCode::NO_CONTENT);
    newer.assert_status_ok();
    assert!(newer.text().contains("Alien"));
}

#[tokio::test]
async fn test_home_fragment_renders_grid_only() {
    let api = Arc::new(StubApi {
        feeds: HashMap::from([(Category::Upcoming, vec![card(9, "Soon")])]),
        ..Default::default()
    });
    let server = create_test_server(api, DiscoverySettings::default());

    let response = server
        .get("/fragments/home")
        .add_query_param("category", "upcoming")
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains(r#"<section class="grid-section">"#));
    assert!(!html.contains("<html"));
    assert!(html.contains("<h3>UPCOMING</h3>"));
    assert_eq!(link_count(&html), 1);
}
