//! Login page covering sign-in, sign-up and password reset.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted at `/login` (starting in `Login`) and `/signup` (starting in
//! `SignUp`). All decisions live in [`AuthForm`]; this page binds inputs,
//! runs the gateway call in a local task, and turns the outcome into a notice
//! and, after a sign-in, a navigation to the dashboard.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::net::error::{Field, ValidationError};
#[cfg(feature = "hydrate")]
use crate::net::identity::FirebaseIdentity;
use crate::state::auth::{AuthForm, AuthMode};
#[cfg(feature = "hydrate")]
use crate::state::auth::{Submission, dispatch};
#[cfg(feature = "hydrate")]
use crate::state::notice::NoticeState;

/// Message to show under `field`, if the last validation failure belongs to it.
fn field_message(error: Option<ValidationError>, field: Field) -> Option<&'static str> {
    error.filter(|e| e.field() == field).map(ValidationError::message)
}

fn submit_label(mode: AuthMode, busy: bool) -> &'static str {
    match (mode, busy) {
        (_, true) => "Please wait...",
        (AuthMode::Login, false) => "Login",
        (AuthMode::SignUp, false) => "Sign Up",
        (AuthMode::ForgotPassword, false) => "Send Reset Email",
    }
}

#[component]
pub fn LoginPage(mode: AuthMode) -> impl IntoView {
    let form = RwSignal::new(AuthForm::new(mode));

    #[cfg(feature = "hydrate")]
    let run = {
        let identity = expect_context::<FirebaseIdentity>();
        let notices = expect_context::<RwSignal<NoticeState>>();
        let navigate = use_navigate();
        move |submission: Submission| {
            let identity = identity.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let outcome = dispatch(&identity, submission).await;
                form.update(|f| f.finish(&outcome));
                crate::components::notices::notify(notices, outcome.notice.clone());
                if let Some(route) = outcome.redirect {
                    navigate(route.path(), NavigateOptions::default());
                }
            });
        }
    };

    let on_submit = {
        #[cfg(feature = "hydrate")]
        let run = run.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Some(Ok(Some(submission))) = form.try_update(AuthForm::begin_submit) else {
                return;
            };
            #[cfg(feature = "hydrate")]
            run(submission);
            #[cfg(not(feature = "hydrate"))]
            let _ = submission;
        }
    };

    let on_google = move |_| {
        let Some(Some(submission)) = form.try_update(AuthForm::begin_google) else {
            return;
        };
        #[cfg(feature = "hydrate")]
        run(submission);
        #[cfg(not(feature = "hydrate"))]
        let _ = submission;
    };

    let mode_now = move || form.with(|f| f.mode);
    let busy = move || form.with(|f| f.busy);
    let error = move |field: Field| form.with(|f| field_message(f.field_error, field));

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Hospital Finder"</h1>
                <p class="login-card__subtitle">{move || mode_now().title()}</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="Email"
                        prop:value=move || form.with(|f| f.fields.email.clone())
                        on:input=move |ev| form.update(|f| f.fields.email = event_target_value(&ev))
                    />
                    <FieldError message=Signal::derive(move || error(Field::Email))/>
                    <Show when=move || mode_now() != AuthMode::ForgotPassword>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || form.with(|f| f.fields.password.clone())
                            on:input=move |ev| form.update(|f| f.fields.password = event_target_value(&ev))
                        />
                        <FieldError message=Signal::derive(move || error(Field::Password))/>
                    </Show>
                    <Show when=move || mode_now() == AuthMode::SignUp>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Confirm Password"
                            prop:value=move || form.with(|f| f.fields.confirm_password.clone())
                            on:input=move |ev| form.update(|f| f.fields.confirm_password = event_target_value(&ev))
                        />
                        <FieldError message=Signal::derive(move || error(Field::ConfirmPassword))/>
                    </Show>
                    <button class="login-button" type="submit" disabled=busy>
                        {move || submit_label(mode_now(), busy())}
                    </button>
                </form>
                <button
                    class="login-button login-button--google"
                    class:hidden=move || mode_now() != AuthMode::Login
                    disabled=busy
                    on:click=on_google
                >
                    "Sign in with Google"
                </button>
                <div class="login-links">
                    <Show when=move || mode_now() != AuthMode::ForgotPassword>
                        <button class="link-button" on:click=move |_| { form.update(|f| { f.toggle_sign_up(); }); }>
                            {move || if mode_now() == AuthMode::SignUp { "Already have an account? Login" } else { "Sign up" }}
                        </button>
                    </Show>
                    <Show when=move || mode_now() != AuthMode::SignUp>
                        <button class="link-button" on:click=move |_| { form.update(|f| { f.toggle_forgot_password(); }); }>
                            {move || if mode_now() == AuthMode::ForgotPassword { "Back to login" } else { "Forgot password?" }}
                        </button>
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
fn FieldError(message: Signal<Option<&'static str>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <p class="field-error">{move || message.get()}</p>
        </Show>
    }
}
