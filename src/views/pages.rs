//! Full pages for the three screens plus error pages.

use axum::http::StatusCode;
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use super::grid::CardGrid;
use super::layout::document;
use crate::models::Category;
use crate::services::adapters::genre_line;
use crate::services::discovery::{DetailsView, HomeView, SearchView};

/// What the home screen shows below the search box
pub enum HomeContent {
    Feed(HomeView),
    Search(SearchView),
}

/// Query box wired to live search through its `data-*` attributes
#[component]
fn SearchBox(action: &'static str, query: String, min_len: usize) -> impl IntoView {
    view! {
        <form class="search" action=action method="get">
            <input
                type="text"
                name="query"
                value=query
                placeholder="Search movies..."
                autocomplete="off"
                data-live-search="true"
                data-target="search-results"
                data-min-length=min_len.to_string()
            />
        </form>
    }
}

#[component]
fn CategoryTabs(selected: Category) -> impl IntoView {
    view! {
        <div class="tabs">
            {Category::ALL
                .iter()
                .map(|category| {
                    let class = if *category == selected { "tab active" } else { "tab" };
                    let href = format!("/?category={}", category.as_str());
                    view! { <a class=class href=href>{category.label()}</a> }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn BackLink() -> impl IntoView {
    view! { <a class="back" href="/">"← Back to Home"</a> }
}

fn search_results(view: SearchView) -> Option<impl IntoView> {
    if view.query.is_empty() {
        return None;
    }
    let title = Some("Search Results".to_string());
    Some(view! { <CardGrid title=title section=view.results /> })
}

/// Home screen: search box, then either search results or a category feed
pub fn home_page(content: HomeContent, min_len: usize) -> String {
    let (query, results, feed) = match content {
        HomeContent::Search(view) => (view.query.clone(), search_results(view), None),
        HomeContent::Feed(view) => (String::new(), None, Some(view)),
    };

    let feed = feed.map(|view| {
        let title = Some(view.category.label());
        view! {
            <CategoryTabs selected=view.category />
            <CardGrid title=title section=view.feed />
        }
    });

    let body = view! {
        <SearchBox action="/" query=query min_len=min_len />
        <div id="search-results">{results}</div>
        {feed}
    };

    document("Home", body)
}

/// Standalone search screen
pub fn search_page(view: SearchView, min_len: usize) -> String {
    let query = view.query.clone();
    let results = search_results(view);

    let body = view! {
        <h2>"Search Movies"</h2>
        <SearchBox action="/search" query=query min_len=min_len />
        <div id="search-results">{results}</div>
    };

    document("Search", body)
}

/// Results region swapped in by live search; empty for an empty query
pub fn search_fragment(view: SearchView) -> String {
    search_results(view)
        .map(|results| results.to_html())
        .unwrap_or_default()
}

/// Details screen: header from the primary record, then each recommendation group
pub fn details_page(view: DetailsView) -> String {
    let DetailsView { details, groups } = view;
    let title = details.title.clone();

    let poster = match details.poster_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => {
            let (src, alt) = (url.to_string(), title.clone());
            view! { <div class="poster"><img src=src alt=alt /></div> }.into_any()
        }
        None => view! { <div class="poster placeholder">"No Image"</div> }.into_any(),
    };

    // Backdrop sits behind a dark gradient so the header text stays legible.
    let backdrop = details
        .backdrop_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(|url| {
            format!(
                "background-image: linear-gradient(rgba(15,23,42,.85), rgba(15,23,42,.95)), url('{}')",
                url
            )
        })
        .unwrap_or_default();

    let meta: Vec<String> = [
        details.release_date.clone().filter(|d| !d.trim().is_empty()),
        Some(genre_line(&details)).filter(|g| !g.is_empty()),
    ]
    .into_iter()
    .flatten()
    .collect();
    let meta = (!meta.is_empty()).then(|| meta.join(" • "));

    let overview = details.overview.clone().filter(|o| !o.trim().is_empty());

    let groups = groups
        .into_iter()
        .map(|group| {
            let heading = Some(group.kind.title().to_string());
            view! { <CardGrid title=heading section=group.cards /> }
        })
        .collect_view();

    let heading = title.clone();
    let body = view! {
        <article class="details" style=backdrop>
            {poster}
            <div>
                <h1>{heading}</h1>
                {meta.map(|meta| view! { <p class="meta">{meta}</p> })}
                {overview.map(|overview| view! { <p class="overview">{overview}</p> })}
            </div>
        </article>
        {groups}
        <BackLink />
    };

    document(&title, body)
}

pub fn not_found_page() -> String {
    document(
        "Not Found",
        view! {
            <h2>"Page not found"</h2>
            <BackLink />
        },
    )
}

/// Page shown when a whole screen fails; the message is shown verbatim
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    let message = message.to_string();

    document(
        "Error",
        view! {
            <h2>{heading}</h2>
            <p class="error">{message}</p>
            <BackLink />
        },
    )
}
