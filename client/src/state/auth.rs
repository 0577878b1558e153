//! Auth view state machine for the login page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login page holds an `RwSignal<AuthForm>` and drives it in three steps:
//! `begin_submit` (synchronous validation, sets `busy`), `dispatch` (the one
//! gateway call, awaited outside any signal borrow), then `finish` (applies
//! the transition). Native tests run the same steps through `submit`.
//!
//! DESIGN
//! ======
//! Modes form a star around `Login`: `Login ⇄ SignUp` and
//! `Login ⇄ ForgotPassword`. Each gateway call ends in exactly one notice,
//! either success plus transition or failure with the form left as it was.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::error::{AuthError, ValidationError};
use crate::net::identity::IdentityGateway;
use crate::net::types::Session;
use crate::state::notice::Notice;
use crate::util::auth::Route;

// =============================================================================
// MODES AND FIELDS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
    ForgotPassword,
}

impl AuthMode {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::SignUp => "Sign Up",
            Self::ForgotPassword => "Reset Password",
        }
    }
}

/// Raw form input. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthFields {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A validated request ready for the identity gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Login { email: String, password: String },
    SignUp { email: String, password: String },
    ForgotPassword { email: String },
    Google,
}

/// Result of one gateway call, before it is applied to the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthOutcome {
    pub succeeded: bool,
    pub notice: Notice,
    /// Session returned by a successful sign-in.
    pub session: Option<Session>,
    pub redirect: Option<Route>,
    /// Mode the form moves to on success.
    next_mode: Option<AuthMode>,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub fields: AuthFields,
    /// Last local validation failure, shown next to its field.
    pub field_error: Option<ValidationError>,
    /// A submission is in flight.
    pub busy: bool,
}

impl AuthForm {
    #[must_use]
    pub fn new(mode: AuthMode) -> Self {
        Self { mode, ..Self::default() }
    }

    /// `Login ⇄ SignUp`. Returns `false` (and changes nothing) from `ForgotPassword`.
    pub fn toggle_sign_up(&mut self) -> bool {
        let next = match self.mode {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
            AuthMode::ForgotPassword => return false,
        };
        self.enter(next);
        true
    }

    /// `Login ⇄ ForgotPassword`. Returns `false` (and changes nothing) from `SignUp`.
    pub fn toggle_forgot_password(&mut self) -> bool {
        let next = match self.mode {
            AuthMode::Login => AuthMode::ForgotPassword,
            AuthMode::ForgotPassword => AuthMode::Login,
            AuthMode::SignUp => return false,
        };
        self.enter(next);
        true
    }

    fn enter(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.fields = AuthFields::default();
        self.field_error = None;
    }

    /// Check the fields required by the current mode.
    ///
    /// # Errors
    ///
    /// The first failing field, in form order.
    pub fn validate(&self) -> Result<Submission, ValidationError> {
        let email = self.fields.email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        if self.mode == AuthMode::ForgotPassword {
            return Ok(Submission::ForgotPassword { email: email.to_owned() });
        }
        let password = &self.fields.password;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if self.mode == AuthMode::Login {
            return Ok(Submission::Login { email: email.to_owned(), password: password.clone() });
        }
        if self.fields.confirm_password.is_empty() {
            return Err(ValidationError::EmptyConfirmPassword);
        }
        if self.fields.confirm_password != *password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(Submission::SignUp { email: email.to_owned(), password: password.clone() })
    }

    /// Validate and mark the form busy.
    ///
    /// Returns `Ok(None)` when a submission is already in flight.
    ///
    /// # Errors
    ///
    /// The validation failure; it is also recorded in `field_error`.
    pub fn begin_submit(&mut self) -> Result<Option<Submission>, ValidationError> {
        if self.busy {
            return Ok(None);
        }
        match self.validate() {
            Ok(submission) => {
                self.field_error = None;
                self.busy = true;
                Ok(Some(submission))
            }
            Err(e) => {
                self.field_error = Some(e);
                Err(e)
            }
        }
    }

    /// Start the Google popup flow. Only offered in `Login` mode.
    pub fn begin_google(&mut self) -> Option<Submission> {
        if self.busy || self.mode != AuthMode::Login {
            return None;
        }
        self.busy = true;
        Some(Submission::Google)
    }

    /// Apply a finished gateway call.
    pub fn finish(&mut self, outcome: &AuthOutcome) {
        self.busy = false;
        if !outcome.succeeded {
            return;
        }
        self.fields = AuthFields::default();
        self.field_error = None;
        if let Some(mode) = outcome.next_mode {
            self.mode = mode;
        }
    }

    /// Validate, call the gateway and apply the outcome in one go.
    ///
    /// # Errors
    ///
    /// Local validation failures; no gateway call is made for them.
    pub async fn submit<G: IdentityGateway>(&mut self, gateway: &G) -> Result<Option<AuthOutcome>, ValidationError> {
        let Some(submission) = self.begin_submit()? else {
            return Ok(None);
        };
        let outcome = dispatch(gateway, submission).await;
        self.finish(&outcome);
        Ok(Some(outcome))
    }

    /// Google counterpart of [`AuthForm::submit`].
    pub async fn submit_google_login<G: IdentityGateway>(&mut self, gateway: &G) -> Option<AuthOutcome> {
        let submission = self.begin_google()?;
        let outcome = dispatch(gateway, submission).await;
        self.finish(&outcome);
        Some(outcome)
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Perform the single gateway call for `submission`.
pub async fn dispatch<G: IdentityGateway>(gateway: &G, submission: Submission) -> AuthOutcome {
    match submission {
        Submission::Login { email, password } => signed_in(
            gateway.sign_in(&email, &password).await,
            "Login successful!",
            "Login failed. Please try again.",
        ),
        Submission::Google => signed_in(
            gateway.sign_in_with_popup().await,
            "Google login successful!",
            "Google login failed. Please try again.",
        ),
        Submission::SignUp { email, password } => match gateway.sign_up(&email, &password).await {
            Ok(session) => {
                log::info!("account created for {}", session.email);
                success(Notice::success("Sign up successful! Please log in."), None, None, Some(AuthMode::Login))
            }
            Err(e) => failure(&e, "Sign up failed. Please try again."),
        },
        Submission::ForgotPassword { email } => match gateway.request_password_reset(&email).await {
            Ok(()) => success(Notice::success("Password reset email sent. Check your inbox."), None, None, None),
            Err(e) => failure(&e, "Error sending reset email. Please try again."),
        },
    }
}

fn signed_in(result: Result<Session, AuthError>, ok: &str, generic: &str) -> AuthOutcome {
    match result {
        Ok(session) => {
            log::info!("signed in as {}", session.uid);
            success(Notice::success(ok), Some(session), Some(Route::Dashboard), None)
        }
        Err(e) => failure(&e, generic),
    }
}

fn success(notice: Notice, session: Option<Session>, redirect: Option<Route>, next_mode: Option<AuthMode>) -> AuthOutcome {
    AuthOutcome { succeeded: true, notice, session, redirect, next_mode }
}

fn failure(error: &AuthError, generic: &str) -> AuthOutcome {
    log::warn!("auth request failed: {error}");
    let message = error.specific_message().unwrap_or(generic);
    AuthOutcome { succeeded: false, notice: Notice::failure(message), session: None, redirect: None, next_mode: None }
}
