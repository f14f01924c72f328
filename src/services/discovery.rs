use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{BundleParams, Category, MovieCard, MovieDetails, RecommendationBundle},
    services::{adapters, providers::MovieApi},
};

/// Render state of one independently fetched section
///
/// Derived from the fetch result rather than tracked by hand. An empty list is
/// `Ready(vec![])`; the renderer decides how to show it.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    /// No request was issued; carries an optional hint for the user
    Idle(Option<String>),
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Section<T> {
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Section<U> {
        match self {
            Section::Idle(hint) => Section::Idle(hint.clone()),
            Section::Loading => Section::Loading,
            Section::Failed(message) => Section::Failed(message.clone()),
            Section::Ready(value) => Section::Ready(f(value)),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Section::Failed(_))
    }
}

impl<T> From<AppResult<T>> for Section<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(e) => Section::Failed(e.to_string()),
        }
    }
}

pub type CardSection = Section<Vec<MovieCard>>;

/// Tunables for the discovery flows
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub image_base_url: String,
    pub home_limit: u32,
    pub min_query_len: usize,
    pub bundle: BundleParams,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DiscoverySettings {
    fn from(config: &Config) -> Self {
        Self {
            image_base_url: config.image_base_url.clone(),
            home_limit: config.home_limit,
            min_query_len: config.min_query_len,
            bundle: BundleParams {
                tfidf_top_n: config.tfidf_top_n,
                hybrid_top_n: config.hybrid_top_n,
                genre_limit: config.genre_limit,
            },
        }
    }
}

/// What a details lookup refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsKey {
    Id(u64),
    Title(String),
}

impl DetailsKey {
    /// Interprets a `/details/{key}` path segment
    ///
    /// Purely numeric segments are always movie ids, so a title made of digits
    /// ("1917", "2012") cannot be looked up this way; use [`DetailsKey::title`]
    /// (the `/details?title=` route) for those.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::InvalidInput("Movie id or title is required".to_string()));
        }
        Ok(match raw.parse::<u64>() {
            Ok(id) => DetailsKey::Id(id),
            Err(_) => DetailsKey::Title(raw.to_string()),
        })
    }

    /// Explicit title lookup, never read as an id
    pub fn title(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::InvalidInput("Movie title is required".to_string()));
        }
        Ok(DetailsKey::Title(raw.to_string()))
    }
}

/// A details record with neither id nor title describes no movie at all
fn ensure_found(details: MovieDetails, missing: impl FnOnce() -> String) -> AppResult<MovieDetails> {
    if details.tmdb_id.is_none() && details.title.trim().is_empty() {
        return Err(AppError::NotFound(missing()));
    }
    Ok(details)
}

/// Recommendation groups shown on the details page, in display order
///
/// All five are cut from one recommendation bundle:
///
/// - `Tfidf`: text-similarity matches on the overview
/// - `Hybrid`: the backend's blended mood/topic ranking, unfiltered
/// - `Genre`: movies sharing the primary genre
/// - `Mood` / `Topic`: hybrid items the backend flagged as a mood or topic
///   match; an item can appear in both, and in `Hybrid`
///
/// Items the backend could not resolve to a TMDB record are left out of
/// every group since they cannot be linked or given a poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Tfidf,
    Hybrid,
    Genre,
    Mood,
    Topic,
}

impl GroupKind {
    pub const ALL: [GroupKind; 5] = [
        GroupKind::Tfidf,
        GroupKind::Hybrid,
        GroupKind::Genre,
        GroupKind::Mood,
        GroupKind::Topic,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            GroupKind::Tfidf => "TF-IDF Similar",
            GroupKind::Hybrid => "Hybrid (Mood + Topic)",
            GroupKind::Genre => "Same Genre",
            GroupKind::Mood => "Similar Mood",
            GroupKind::Topic => "Similar Topic",
        }
    }

    fn cards(&self, bundle: &RecommendationBundle) -> Vec<MovieCard> {
        match self {
            GroupKind::Tfidf => adapters::tfidf_cards(bundle),
            GroupKind::Hybrid => adapters::hybrid_cards(bundle),
            GroupKind::Genre => adapters::genre_cards(bundle),
            GroupKind::Mood => adapters::mood_cards(bundle),
            GroupKind::Topic => adapters::topic_cards(bundle),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationGroup {
    pub kind: GroupKind,
    pub cards: CardSection,
}

#[derive(Debug, Clone)]
pub struct HomeView {
    pub category: Category,
    pub feed: CardSection,
}

#[derive(Debug, Clone)]
pub struct SearchView {
    pub query: String,
    pub results: CardSection,
}

#[derive(Debug, Clone)]
pub struct DetailsView {
    pub details: MovieDetails,
    pub groups: Vec<RecommendationGroup>,
}

impl DetailsView {
    pub fn group(&self, kind: GroupKind) -> Option<&RecommendationGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }
}

/// Builds the view models behind every screen
pub struct DiscoveryService {
    api: Arc<dyn MovieApi>,
    settings: DiscoverySettings,
}

impl DiscoveryService {
    pub fn new(api: Arc<dyn MovieApi>, settings: DiscoverySettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    /// Category feed; each call yields a fresh set, nothing is merged
    pub async fn home(&self, category: Category) -> HomeView {
        let feed = self
            .api
            .home_feed(category, self.settings.home_limit)
            .await
            .map(adapters::normalize_cards);

        if let Err(e) = &feed {
            tracing::warn!(category = %category, error = %e, "Home feed unavailable");
        }

        HomeView {
            category,
            feed: feed.into(),
        }
    }

    /// Title search behind the minimum-length gate
    pub async fn search(&self, query: &str) -> SearchView {
        let query = query.trim().to_string();

        if !adapters::query_is_searchable(&query, self.settings.min_query_len) {
            return SearchView {
                results: Section::Idle(Some(format!(
                    "Type at least {} characters to search.",
                    self.settings.min_query_len
                ))),
                query,
            };
        }

        let results = self
            .api
            .search(&query)
            .await
            .map(|page| adapters::search_results_to_cards(page, &self.settings.image_base_url));

        if let Err(e) = &results {
            tracing::warn!(query = %query, error = %e, "Search failed");
        }

        SearchView {
            query,
            results: results.into(),
        }
    }

    /// Details header plus every recommendation group
    ///
    /// For an id, a recommendation failure leaves the header intact and marks
    /// each group failed. For a title the bundle is the only source, so its
    /// failure fails the page.
    pub async fn details(&self, key: &DetailsKey) -> AppResult<DetailsView> {
        match key {
            DetailsKey::Id(id) => {
                let details = ensure_found(self.api.movie_details(*id).await?, || {
                    format!("No movie with id {}", id)
                })?;
                let title = details.title.trim().to_string();

                if title.is_empty() {
                    tracing::warn!(tmdb_id = id, "Details have no title, skipping recommendations");
                    return Ok(Self::view(details, Section::Idle(None)));
                }

                let bundle: Section<RecommendationBundle> = self
                    .api
                    .recommendations(&title, self.settings.bundle)
                    .await
                    .into();

                if let Section::Failed(e) = &bundle {
                    tracing::warn!(tmdb_id = id, title = %title, error = %e, "Recommendations unavailable");
                }

                Ok(Self::view(details, bundle))
            }
            DetailsKey::Title(title) => {
                let bundle = self
                    .api
                    .recommendations(title, self.settings.bundle)
                    .await?;
                let details = ensure_found(bundle.movie_details.clone(), || {
                    format!("No movie matches '{}'", title)
                })?;
                Ok(Self::view(details, Section::Ready(bundle)))
            }
        }
    }

    fn view(details: MovieDetails, bundle: Section<RecommendationBundle>) -> DetailsView {
        let groups = GroupKind::ALL
            .into_iter()
            .map(|kind| RecommendationGroup {
                kind,
                cards: bundle.map(|b| kind.cards(b)),
            })
            .collect();

        DetailsView { details, groups }
    }
}
