//! Dashboard page: hospital search by place name or map location.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only protected route. The route guard bounces it to `/login`
//! whenever the session ends; everything below the header only renders while
//! a session is present. Lookups follow the [`DashboardState`] protocol:
//! `begin` before the request, `settle` after it.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::hospital_results::HospitalResults;
use crate::components::map_modal::MapModal;
use crate::net::error::{AuthError, ValidationError};
use crate::net::lookup::LookupRequest;
use crate::net::types::{Coordinates, Session};
use crate::state::dashboard::{DashboardState, LookupKind};
use crate::state::session::SessionStore;
use crate::util::auth::{Route, install_route_guard};

fn welcome(session: Option<&Session>) -> String {
    format!("Welcome, {}", session.map_or("User", Session::label))
}

#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn sign_out_failure(error: &AuthError) -> String {
    match error.specific_message() {
        Some(message) => format!("Error signing out: {message}"),
        None => "Error signing out. Please try again.".to_owned(),
    }
}

fn lookup_button_class(active: Option<LookupKind>, kind: LookupKind) -> &'static str {
    if active == Some(kind) { "button button--active" } else { "button" }
}

/// Dashboard page. Redirects to `/login` when there is no session.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let store = expect_context::<RwSignal<SessionStore>>();
    let dashboard = RwSignal::new(DashboardState::default());
    install_route_guard(store, Route::Dashboard, use_navigate());

    #[cfg(feature = "hydrate")]
    let notices = expect_context::<RwSignal<crate::state::notice::NoticeState>>();
    #[cfg(feature = "hydrate")]
    let lookup = StoredValue::new(expect_context::<crate::net::lookup::HttpLookup>());
    #[cfg(feature = "hydrate")]
    let identity = StoredValue::new(expect_context::<crate::net::identity::FirebaseIdentity>());

    let run_lookup = move |request: LookupRequest| {
        let Some(ticket) = dashboard.try_update(|d| d.begin(&request)) else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            let lookup = lookup.get_value();
            leptos::task::spawn_local(async move {
                let result = request.send(&lookup).await;
                let settlement = dashboard.try_update(|d| store.try_update(|s| d.settle(ticket, result, s))).flatten();
                if let Some(notice) = settlement.and_then(|s| s.notice()) {
                    crate::components::notices::notify(notices, notice);
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (request, ticket);
    };

    let on_place = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(Ok(request)) = dashboard.try_update(DashboardState::prepare_place) {
            run_lookup(request);
        }
    };

    let on_pick = move |coords: Coordinates| run_lookup(LookupRequest::Location(coords));

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            use crate::net::identity::IdentityGateway;
            let identity = identity.get_value();
            leptos::task::spawn_local(async move {
                if let Err(e) = identity.sign_out().await {
                    crate::components::notices::notify(
                        notices,
                        crate::state::notice::Notice::failure(sign_out_failure(&e)),
                    );
                }
            });
        }
    };

    let signed_in = move || store.with(|s| s.session().is_some());
    let loading = move |kind: LookupKind| dashboard.with(|d| d.is_loading(kind));
    let active = move || dashboard.with(|d| d.active);

    view! {
        <Show
            when=signed_in
            fallback=|| view! { <div class="dashboard-loading">"Loading..."</div> }
        >
            <div class="dashboard-page">
                <header class="dashboard-header">
                    <h1>"Hospital Finder"</h1>
                    <span class="dashboard-header__user">{move || store.with(|s| welcome(s.session()))}</span>
                    <button class="button button--ghost" on:click=on_logout>"Logout"</button>
                </header>

                <section class="search">
                    <form class="search__form" on:submit=on_place>
                        <input
                            class="search__input"
                            type="text"
                            placeholder="Enter a place name"
                            prop:value=move || dashboard.with(|d| d.place_input.clone())
                            on:input=move |ev| dashboard.update(|d| d.place_input = event_target_value(&ev))
                        />
                        <button
                            type="submit"
                            class=move || lookup_button_class(active(), LookupKind::Place)
                            disabled=move || loading(LookupKind::Place)
                        >
                            {move || if loading(LookupKind::Place) { "Searching..." } else { "Search" }}
                        </button>
                    </form>
                    <Show when=move || dashboard.with(|d| d.field_error.is_some())>
                        <p class="field-error">
                            {move || dashboard.with(|d| d.field_error.map(ValidationError::message))}
                        </p>
                    </Show>
                    <button
                        class=move || lookup_button_class(active(), LookupKind::Map)
                        disabled=move || loading(LookupKind::Map)
                        on:click=move |_| dashboard.update(|d| d.map_open = true)
                    >
                        {move || if loading(LookupKind::Map) { "Searching..." } else { "Select on Map" }}
                    </button>
                </section>

                <HospitalResults/>

                <MapModal
                    open=Signal::derive(move || dashboard.with(|d| d.map_open))
                    on_pick=on_pick
                    on_close=move |()| dashboard.update(|d| d.map_open = false)
                />
            </div>
        </Show>
    }
}
