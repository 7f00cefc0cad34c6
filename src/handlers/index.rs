//! Clock page
//!
//! Counts the visit, then renders the current Moscow time.

use axum::{extract::State, response::Html};

use crate::clock;
use crate::handlers::AppState;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Moscow time</title>
</head>
<body>
    <h1>Current time in Moscow</h1>
    <p>time: "{{time}}"</p>
</body>
</html>
"#;

/// Render the page for an already formatted time
pub fn render_page(time: &str) -> String {
    PAGE_TEMPLATE.replace("{{time}}", time)
}

/// Clock page handler
///
/// The visit increment is awaited so sequential visits are visible to
/// `/visits` in order, but its result never changes the response.
pub async fn handler(State(state): State<AppState>) -> Html<String> {
    let visit_count = state.visits().increment().await;
    tracing::debug!(visit_count, "Visit counted");

    Html(render_page(&clock::now_formatted()))
}
