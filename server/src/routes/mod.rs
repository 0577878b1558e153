//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the Leptos SSR app, its compiled assets under
//! `/pkg`, the Google sign-in popup landing page and a health probe. The
//! browser-visible configuration is provided to every SSR render as context
//! and embedded in the HTML shell for hydration.

pub mod health;
pub mod popup;

use std::path::PathBuf;

use axum::Router;
use axum::routing::get;
use client::net::popup::POPUP_PATH;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Full application router.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section).
pub fn app(config: &AppConfig) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let client_config = config.client_config();
    // Route discovery renders the app, which needs its configuration.
    let routes = generate_route_list({
        let client_config = client_config.clone();
        move || {
            provide_context(client_config.clone());
            client::app::App()
        }
    });

    let leptos_router = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let client_config = client_config.clone();
                move || provide_context(client_config.clone())
            },
            {
                let opts = leptos_options.clone();
                move || client::app::shell(opts.clone(), client_config.clone())
            },
        )
        .with_state(leptos_options.clone());

    // Compiled WASM, JS and CSS live under the site root's /pkg directory.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(Router::new()
        .route("/healthz", get(health::healthz))
        .route(POPUP_PATH, get(popup::landing))
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(TraceLayer::new_for_http()))
}
