//! Landing page for the Google sign-in popup.
//!
//! Google redirects the popup here with the id token in the URL fragment.
//! The fragment never reaches the server; the opener window reads it from
//! the popup once this same-origin page has loaded, then closes the popup.

#[cfg(test)]
#[path = "popup_test.rs"]
mod popup_test;

use axum::http::header;
use axum::response::{Html, IntoResponse};

const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="referrer" content="no-referrer">
<title>Signing in</title>
</head>
<body>
<p>Completing sign-in. This window will close automatically.</p>
</body>
</html>
"#;

/// `GET /auth/popup`
pub async fn landing() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Html(LANDING_HTML))
}
