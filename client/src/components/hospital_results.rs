//! Rendering of the last hospital lookup result.

use leptos::prelude::*;

use crate::state::session::SessionStore;

/// One card per result block; the first line of a block is its heading.
#[component]
pub fn HospitalResults() -> impl IntoView {
    let store = expect_context::<RwSignal<SessionStore>>();
    let blocks = move || store.with(|s| s.hospitals().map(|r| r.blocks()).unwrap_or_default());

    view! {
        <Show when=move || !blocks().is_empty()>
            <section class="results">
                <h2 class="results__title">"Nearby Hospitals"</h2>
                <For
                    each=move || blocks().into_iter().enumerate()
                    key=|(i, block)| (*i, block.clone())
                    children=move |(_, block)| {
                        let mut lines = block.into_iter();
                        let heading = lines.next().unwrap_or_default();
                        view! {
                            <article class="results__card">
                                <h3>{heading}</h3>
                                {lines.map(|line| view! { <p>{line}</p> }).collect_view()}
                            </article>
                        }
                    }
                />
            </section>
        </Show>
    }
}
