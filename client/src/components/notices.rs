//! Toast notices shown above every page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call [`notify`] with the `RwSignal<NoticeState>` from context;
//! [`NoticeStack`] (mounted once by the app) renders whatever is queued.

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use crate::state::notice::NOTICE_TIMEOUT_MS;
use crate::state::notice::{Notice, NoticeState};

/// Show `notice` and schedule its dismissal.
pub fn notify(notices: RwSignal<NoticeState>, notice: Notice) {
    let Some(id) = notices.try_update(|n| n.push(notice)) else {
        return;
    };
    #[cfg(feature = "hydrate")]
    gloo_timers::callback::Timeout::new(NOTICE_TIMEOUT_MS, move || notices.update(|n| n.dismiss(id))).forget();
    #[cfg(not(feature = "hydrate"))]
    let _ = id;
}

#[component]
pub fn NoticeStack() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeState>>();

    view! {
        <div class="notice-stack" role="status" aria-live="polite">
            <For
                each=move || notices.get().items
                key=|(id, _)| *id
                children=move |(id, notice)| {
                    view! {
                        <div class=format!("notice {}", notice.kind.class())>
                            <span class="notice__message">{notice.message}</span>
                            <button
                                class="notice__close"
                                aria-label="Dismiss"
                                on:click=move |_| notices.update(|n| n.dismiss(id))
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
