//! Public landing page.

use leptos::prelude::*;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing-page">
            <h1>"Hospital Finder"</h1>
            <p>"Find hospitals near any place, by name or on the map."</p>
            <a href="/login" class="login-button">
                "Login to Explore"
            </a>
        </div>
    }
}
