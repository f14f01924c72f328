//! Document shell shared by every page.

use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use super::grid::SKELETON_COUNT;

/// Full HTML document: navigation bar, inline styles and the live-search script
///
/// The page body is passed as children. The script runs without any client
/// framework; it only swaps server-rendered fragments into the page.
#[component]
pub fn Layout(title: String, children: Children) -> impl IntoView {
    let script = live_search_script(SKELETON_COUNT);

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>{format!("{} | CineSuggest", title)}</title>
                <style inner_html=STYLES></style>
            </head>
            <body>
                <nav class="topbar">
                    <a class="brand" href="/">"CineSuggest"</a>
                    <span class="tagline">"Discover your next favorite movie"</span>
                </nav>
                <main>{children()}</main>
                <script inner_html=script></script>
            </body>
        </html>
    }
}

/// Renders `body` inside [`Layout`] and returns the finished document
pub fn document(title: &str, body: impl IntoView + 'static) -> String {
    let title = title.to_string();
    view! { <Layout title=title>{body}</Layout> }.to_html()
}

const STYLES: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
a { color: inherit; text-decoration: none; }
.topbar { display: flex; justify-content: space-between; align-items: center; padding: 1rem 1.5rem; border-bottom: 1px solid rgba(255,255,255,.1); position: sticky; top: 0; background: rgba(15,23,42,.85); }
.brand { font-size: 1.75rem; font-weight: 700; color: #818cf8; }
.tagline { color: #94a3b8; font-size: .875rem; }
main { max-width: 80rem; margin: 0 auto; padding: 2rem 1.5rem; }
.search input { width: 100%; max-width: 36rem; padding: 1rem 1.5rem; font-size: 1.1rem; border-radius: 1rem; border: 1px solid rgba(255,255,255,.2); background: rgba(255,255,255,.08); color: inherit; }
.tabs { display: flex; flex-wrap: wrap; gap: .75rem; margin: 2rem 0; }
.tab { padding: .5rem 1.5rem; border-radius: 999px; background: rgba(255,255,255,.1); font-size: .875rem; }
.tab.active { background: #4f46e5; color: #fff; }
.grid-section { margin: 2.5rem 0; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(10rem, 1fr)); gap: 1.5rem; }
.card { display: block; border-radius: 1rem; overflow: hidden; background: #1e293b; }
.poster { aspect-ratio: 2 / 3; background: #1e293b; display: flex; align-items: center; justify-content: center; }
.poster img { width: 100%; height: 100%; object-fit: cover; }
.placeholder { color: #475569; }
.card-body { padding: .75rem; }
.card-title { margin: 0; font-size: .9rem; font-weight: 500; }
.card-meta { margin: .25rem 0 0; font-size: .75rem; color: #94a3b8; }
.skeleton { aspect-ratio: 2 / 3; border-radius: 1rem; background: #1e293b; animation: pulse 1.5s infinite; }
@keyframes pulse { 50% { opacity: .5; } }
.error { color: #f87171; }
.empty, .hint { color: #64748b; }
.details { display: grid; grid-template-columns: minmax(0, 1fr) minmax(0, 2fr); gap: 2.5rem; padding: 1.5rem; border-radius: 1.5rem; background-size: cover; }
.details h1 { font-size: 3rem; margin: 0 0 1rem; }
.meta { color: #cbd5e1; }
.overview { font-size: 1.1rem; line-height: 1.7; color: #cbd5e1; }
.back { display: inline-block; margin-top: 2rem; color: #818cf8; }
"#;

/// Live search: every keystroke is tagged with a generation. Responses for a
/// superseded generation are ignored, and the server answers them with 204.
///
/// While a request is pending the results region shows `skeletons` loading
/// tiles, matching the grid's own loading state.
fn live_search_script(skeletons: usize) -> String {
    format!(
        r#"
(function () {{
  var input = document.querySelector('[data-live-search]');
  if (!input) return;
  var target = document.getElementById(input.getAttribute('data-target'));
  var minLength = parseInt(input.getAttribute('data-min-length') || '2', 10);
  var loading = '<section class="grid-section"><div class="grid" aria-busy="true">'
    + '<div class="skeleton"></div>'.repeat({skeletons}) + '</div></section>';
  var sid = Math.random().toString(36).slice(2);
  var generation = 0;
  input.addEventListener('input', function () {{
    var query = input.value.trim();
    var mine = ++generation;
    if (query.length >= minLength) target.innerHTML = loading;
    var url = '/fragments/search?query=' + encodeURIComponent(query) + '&sid=' + sid + '&gen=' + mine;
    fetch(url).then(function (res) {{
      return res.status === 200 && mine === generation ? res.text() : null;
    }}).then(function (html) {{
      if (html !== null && mine === generation) target.innerHTML = html;
    }}).catch(function (err) {{
      if (mine !== generation) return;
      var p = document.createElement('p');
      p.className = 'error';
      p.textContent = 'Error: ' + err.message;
      target.replaceChildren(p);
    }});
  }});
}})();
"#,
        skeletons = skeletons
    )
}
