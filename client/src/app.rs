//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server renders [`shell`] with the configuration embedded; [`App`]
//! resolves that configuration, builds the gateways, wires the identity
//! gateway's session broadcast into the shared [`SessionStore`], and mounts
//! the routes. Session wiring happens in an effect so it only ever runs in
//! the browser, after hydration.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::notices::NoticeStack;
use crate::config::{CONFIG_ELEMENT_ID, ClientConfig};
use crate::net::identity::{FirebaseIdentity, IdentityGateway};
use crate::net::lookup::HttpLookup;
use crate::pages::{dashboard::DashboardPage, landing::LandingPage, login::LoginPage};
use crate::state::auth::AuthMode;
use crate::state::notice::NoticeState;
use crate::state::session::SessionStore;

const MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions, config: ClientConfig) -> impl IntoView {
    let maps_src = maps_script_url(&config.maps_api_key);
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <script id=CONFIG_ELEMENT_ID type="application/json" inner_html=config.to_embedded_json()></script>
                {maps_src.map(|src| view! { <script defer src=src></script> })}
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

fn maps_script_url(key: &str) -> Option<String> {
    url::Url::parse_with_params(MAPS_SCRIPT_URL, &[("key", key)]).ok().map(String::from)
}

/// Root application component.
///
/// Renders a configuration error instead of the app when the embedded
/// configuration is missing or incomplete.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = use_context::<ClientConfig>().map_or_else(ClientConfig::from_document, Ok);

    view! {
        <Stylesheet id="leptos" href="/pkg/hospital-finder.css"/>
        <Title text="Hospital Finder"/>
        {match config {
            Ok(config) => view! { <Finder config=config/> }.into_any(),
            Err(e) => {
                log::error!("client configuration unavailable: {e}");
                view! {
                    <div class="config-error">
                        <h1>"Hospital Finder is not configured"</h1>
                        <p>{e.to_string()}</p>
                    </div>
                }
                    .into_any()
            }
        }}
    }
}

/// The configured application: shared contexts plus routes.
#[component]
fn Finder(config: ClientConfig) -> impl IntoView {
    let store = RwSignal::new(SessionStore::default());
    let notices = RwSignal::new(NoticeState::default());
    let identity = FirebaseIdentity::new(config.firebase_api_key.clone(), config.google_client_id.clone());
    let lookup = HttpLookup::new(&config.lookup_api_url);

    provide_context(store);
    provide_context(notices);
    provide_context(identity.clone());
    provide_context(lookup);
    provide_context(config);

    connect_session(identity, store);

    view! {
        <Router>
            <main class="finder">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=LandingPage/>
                    <Route path=StaticSegment("login") view=|| view! { <LoginPage mode=AuthMode::Login/> }/>
                    <Route path=StaticSegment("signup") view=|| view! { <LoginPage mode=AuthMode::SignUp/> }/>
                    <Route path=StaticSegment("dashboard") view=DashboardPage/>
                </Routes>
            </main>
            <NoticeStack/>
        </Router>
    }
}

/// Feed every session transition into the store, restoring the persisted
/// session first so the store never resolves to a spurious sign-out.
fn connect_session(identity: FirebaseIdentity, store: RwSignal<SessionStore>) {
    Effect::new(move |_| {
        identity.restore();
        let subscription = identity.subscribe(move |session| {
            store.update(|s| {
                if s.set_session(session.cloned()) {
                    log::info!("session now {}", session.map_or("signed out", |s| s.uid.as_str()));
                }
            });
        });
        on_cleanup(move || subscription.unsubscribe());

        // Another tab signed in or out.
        #[cfg(feature = "hydrate")]
        {
            let identity = identity.clone();
            let _listener = window_event_listener(leptos::ev::storage, move |ev| {
                if ev.key().is_none_or(|key| key == crate::net::identity::SESSION_STORAGE_KEY) {
                    identity.restore();
                }
            });
        }
    });
}
