//! Pure mappings from backend payloads to the card shape every grid renders.

use chrono::{Datelike, NaiveDate};

use crate::models::{MovieCard, MovieDetails, RecommendationBundle, SearchPage};

/// Joins the image base with a backend-relative poster path
///
/// An absent or blank path yields no URL so the renderer falls back to a
/// placeholder instead of a broken image.
pub fn poster_url(image_base: &str, path: Option<&str>) -> Option<String> {
    match path.map(str::trim) {
        Some(path) if !path.is_empty() => Some(format!(
            "{}/{}",
            image_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )),
        _ => None,
    }
}

/// Maps raw search results into cards, dropping results without a title
pub fn search_results_to_cards(page: SearchPage, image_base: &str) -> Vec<MovieCard> {
    page.results
        .into_iter()
        .filter(|result| !result.title.trim().is_empty())
        .map(|result| MovieCard {
            tmdb_id: Some(result.id),
            poster_url: poster_url(image_base, result.poster_path.as_deref()),
            title: result.title,
            release_date: result.release_date,
            vote_average: result.vote_average,
        })
        .collect()
}

/// Clears blank poster URLs on cards that arrive already card-shaped
pub fn normalize_cards(cards: Vec<MovieCard>) -> Vec<MovieCard> {
    cards.into_iter().map(normalize_card).collect()
}

fn normalize_card(mut card: MovieCard) -> MovieCard {
    if card
        .poster_url
        .as_deref()
        .is_some_and(|url| url.trim().is_empty())
    {
        card.poster_url = None;
    }
    card
}

/// Cards embedded in the text-similarity list
///
/// Each item carries the backend's own title and score plus an optional TMDB
/// record. Only the record can become a card; items without one are dropped
/// rather than rendered as unlinked, posterless tiles.
pub fn tfidf_cards(bundle: &RecommendationBundle) -> Vec<MovieCard> {
    bundle
        .tfidf_recommendations
        .iter()
        .filter_map(|item| item.tmdb.clone())
        .map(normalize_card)
        .collect()
}

/// Cards embedded in the hybrid list, in backend order
pub fn hybrid_cards(bundle: &RecommendationBundle) -> Vec<MovieCard> {
    bundle
        .hybrid_recommendations
        .iter()
        .filter_map(|item| item.tmdb.clone())
        .map(normalize_card)
        .collect()
}

/// Hybrid recommendations that share the movie's mood
pub fn mood_cards(bundle: &RecommendationBundle) -> Vec<MovieCard> {
    bundle
        .hybrid_recommendations
        .iter()
        .filter(|item| item.mood_match)
        .filter_map(|item| item.tmdb.clone())
        .map(normalize_card)
        .collect()
}

/// Hybrid recommendations that share the movie's topic
pub fn topic_cards(bundle: &RecommendationBundle) -> Vec<MovieCard> {
    bundle
        .hybrid_recommendations
        .iter()
        .filter(|item| item.topic_match)
        .filter_map(|item| item.tmdb.clone())
        .map(normalize_card)
        .collect()
}

/// Movies sharing the primary genre
///
/// Unlike the scored lists these arrive already card-shaped, so they only
/// need their poster URLs normalized.
pub fn genre_cards(bundle: &RecommendationBundle) -> Vec<MovieCard> {
    normalize_cards(bundle.genre_recommendations.clone())
}

/// Genre names joined for the details header, e.g. "Action, Science Fiction"
pub fn genre_line(details: &MovieDetails) -> String {
    details
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Year of an ISO `YYYY-MM-DD` release date
pub fn release_year(date: Option<&str>) -> Option<i32> {
    let date = date?.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Whether a search query is long enough to be sent to the backend
pub fn query_is_searchable(query: &str, min_len: usize) -> bool {
    query.trim().chars().count() >= min_len
}
