//! Poster grid: renders one card section in whatever state it settled in.

use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::models::MovieCard;
use crate::services::adapters::release_year;
use crate::services::discovery::{CardSection, Section};

/// Skeleton tiles shown while a section is loading
pub const SKELETON_COUNT: usize = 12;

pub const EMPTY_MESSAGE: &str = "No movies found.";

/// Route a card links to
pub fn details_href(tmdb_id: u64) -> String {
    format!("/details/{}", tmdb_id)
}

/// Titled section for any [`Section`] state
///
/// - `Idle` shows its hint (if any) and no grid
/// - `Loading` shows [`SKELETON_COUNT`] skeleton tiles
/// - `Failed` shows the message verbatim, prefixed with `Error:`
/// - `Ready` with no cards shows [`EMPTY_MESSAGE`] and no links
#[component]
pub fn CardGrid(title: Option<String>, section: CardSection) -> impl IntoView {
    let body = match section {
        Section::Idle(Some(hint)) => view! { <p class="hint">{hint}</p> }.into_any(),
        Section::Idle(None) => ().into_any(),
        Section::Loading => view! { <SkeletonGrid count=SKELETON_COUNT /> }.into_any(),
        Section::Failed(message) => {
            view! { <p class="error">{format!("Error: {}", message)}</p> }.into_any()
        }
        Section::Ready(cards) if cards.is_empty() => {
            view! { <p class="empty">{EMPTY_MESSAGE}</p> }.into_any()
        }
        Section::Ready(cards) => view! {
            <div class="grid">
                {cards
                    .into_iter()
                    .map(|card| view! { <PosterCard card=card /> })
                    .collect_view()}
            </div>
        }
        .into_any(),
    };

    view! {
        <section class="grid-section">
            {title.map(|title| view! { <h3>{title}</h3> })}
            {body}
        </section>
    }
}

/// Renders a section on its own, as returned by the fragment routes
pub fn render_section(title: Option<&str>, section: CardSection) -> String {
    let title = title.map(str::to_string);
    view! { <CardGrid title=title section=section /> }.to_html()
}

#[component]
pub fn SkeletonGrid(count: usize) -> impl IntoView {
    view! {
        <div class="grid" aria-busy="true">
            {(0..count).map(|_| view! { <div class="skeleton"></div> }).collect_view()}
        </div>
    }
}

/// One card; linked when the card has an id, placeholder art when it has no poster
#[component]
pub fn PosterCard(card: MovieCard) -> impl IntoView {
    let meta = Some(card_meta(&card)).filter(|m| !m.is_empty());
    let MovieCard {
        tmdb_id,
        title,
        poster_url,
        ..
    } = card;

    let poster = match poster_url.filter(|u| !u.trim().is_empty()) {
        Some(url) => view! {
            <div class="poster">
                <img src=url alt=title.clone() loading="lazy" />
            </div>
        }
        .into_any(),
        None => view! { <div class="poster placeholder">"No Image"</div> }.into_any(),
    };

    let body = view! {
        <div class="card-body">
            <p class="card-title">{title}</p>
            {meta.map(|meta| view! { <p class="card-meta">{meta}</p> })}
        </div>
    };

    match tmdb_id {
        Some(id) => view! { <a class="card" href=details_href(id)>{poster}{body}</a> }.into_any(),
        None => view! { <div class="card">{poster}{body}</div> }.into_any(),
    }
}

/// "1979 · ★ 8.1", either half omitted when unknown
fn card_meta(card: &MovieCard) -> String {
    let year = release_year(card.release_date.as_deref()).map(|y| y.to_string());
    let rating = card
        .vote_average
        .filter(|v| *v > 0.0)
        .map(|v| format!("★ {:.1}", v));

    [year, rating]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ")
}
