//! Server-rendered HTML for every screen and fragment.
//!
//! Pages are Leptos components rendered to strings with `RenderHtml::to_html`;
//! nothing is hydrated on the client. All dynamic text and attribute values
//! go through Leptos' escaping.

pub mod grid;
pub mod layout;
pub mod pages;
