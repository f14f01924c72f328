use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::Category,
    services::DetailsKey,
    views::{
        grid,
        pages::{self, HomeContent},
    },
};

use super::AppState;

// Query types

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchFragmentQuery {
    #[serde(default)]
    pub query: String,
    /// Client key used to supersede older in-flight searches
    pub sid: Option<String>,
    /// Client-side generation of this keystroke
    pub gen: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

fn parse_category(raw: Option<&str>) -> AppResult<Category> {
    match raw.map(str::trim).filter(|c| !c.is_empty()) {
        Some(tag) => tag.parse(),
        None => Ok(Category::default()),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Home screen: category feed, or search results when `query` is present
pub async fn home(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<HomeQuery>,
) -> AppResult<Html<String>> {
    let query = params.query.as_deref().map(str::trim).unwrap_or_default();

    let content = if query.is_empty() {
        let category = parse_category(params.category.as_deref())?;
        tracing::info!(request_id = %request_id, category = %category, "Rendering home feed");
        HomeContent::Feed(state.discovery.home(category).await)
    } else {
        tracing::info!(request_id = %request_id, query = %query, "Rendering home search");
        HomeContent::Search(state.discovery.search(query).await)
    };

    Ok(Html(pages::home_page(content, state.min_query_len())))
}

/// Standalone search screen
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Html<String> {
    tracing::info!(request_id = %request_id, query = %params.query, "Rendering search page");

    let view = state.discovery.search(&params.query).await;
    Html(pages::search_page(view, state.min_query_len()))
}

/// Details screen for a numeric id or a title
///
/// A purely numeric segment is always read as an id; titles made of digits
/// go through [`details_by_title`].
pub async fn details(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_key): Path<String>,
) -> AppResult<Html<String>> {
    let key = DetailsKey::parse(&raw_key)?;
    render_details(&state, &request_id, key).await
}

/// Details screen looked up by `?title=`, never read as an id
pub async fn details_by_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Html<String>> {
    let key = DetailsKey::title(&params.title)?;
    render_details(&state, &request_id, key).await
}

async fn render_details(
    state: &AppState,
    request_id: &RequestId,
    key: DetailsKey,
) -> AppResult<Html<String>> {
    tracing::info!(request_id = %request_id, key = ?key, "Rendering details");

    let view = state.discovery.details(&key).await?;
    Ok(Html(pages::details_page(view)))
}

/// Older `/movie/{id}` links land on the canonical details route
pub async fn legacy_movie(Path(raw_key): Path<String>) -> Redirect {
    Redirect::permanent(&format!("/details/{}", urlencoding::encode(&raw_key)))
}

/// Live-search results fragment
///
/// Answers `204 No Content` when a newer search from the same client has
/// started, so a slow response can never overwrite a fresher one.
pub async fn search_fragment(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchFragmentQuery>,
) -> Response {
    let sid = params.sid.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let Some(sid) = sid else {
        let view = state.discovery.search(&params.query).await;
        return Html(pages::search_fragment(view)).into_response();
    };

    let Some(ticket) = state.tracker.begin(sid, params.gen) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let generation = ticket.generation();

    match ticket.run(state.discovery.search(&params.query)).await {
        Some(view) => Html(pages::search_fragment(view)).into_response(),
        None => {
            tracing::debug!(
                request_id = %request_id,
                client = %sid,
                generation,
                "Dropping superseded search"
            );
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Category feed fragment
pub async fn home_fragment(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> AppResult<Html<String>> {
    let category = parse_category(params.category.as_deref())?;
    let view = state.discovery.home(category).await;
    Ok(Html(grid::render_section(
        Some(view.category.label().as_str()),
        view.feed,
    )))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::not_found_page()))
}
