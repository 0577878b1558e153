//! Error taxonomy shared by the gateways and state machines.
//!
//! ERROR HANDLING
//! ==============
//! `ValidationError` never crosses a gateway: it is raised and consumed by the
//! state machines before any request is made. `AuthError` and `LookupError`
//! come back from the gateways and are turned into a single transient notice.
//! User-facing text lives in the `message` helpers, not in `Display`, so log
//! lines can stay technical.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Form field a validation error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    ConfirmPassword,
    Place,
    Location,
}

/// Local, field-level input problems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("email is empty")]
    EmptyEmail,
    #[error("password is empty")]
    EmptyPassword,
    #[error("password confirmation is empty")]
    EmptyConfirmPassword,
    #[error("password confirmation does not match")]
    PasswordMismatch,
    #[error("place name is empty")]
    EmptyPlaceName,
    #[error("coordinates are out of range")]
    InvalidCoordinates,
}

impl ValidationError {
    #[must_use]
    pub fn field(self) -> Field {
        match self {
            Self::EmptyEmail => Field::Email,
            Self::EmptyPassword => Field::Password,
            Self::EmptyConfirmPassword | Self::PasswordMismatch => Field::ConfirmPassword,
            Self::EmptyPlaceName => Field::Place,
            Self::InvalidCoordinates => Field::Location,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyEmail => "Please enter your email!",
            Self::EmptyPassword => "Please enter your password!",
            Self::EmptyConfirmPassword => "Please confirm your password!",
            Self::PasswordMismatch => "The two passwords that you entered do not match!",
            Self::EmptyPlaceName => "Please enter a place name",
            Self::InvalidCoordinates => "Please pick a valid location",
        }
    }
}

/// Failures reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("email already in use")]
    EmailInUse,
    #[error("weak password")]
    WeakPassword,
    #[error("sign-in popup closed")]
    PopupClosed,
    /// Opaque provider-side failure (network, quota, disabled account, ...).
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Category-specific text, or `None` when only a generic message fits.
    #[must_use]
    pub fn specific_message(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCredentials => Some("Incorrect email or password."),
            Self::UserNotFound => Some("No account found for that email."),
            Self::EmailInUse => Some("An account with that email already exists."),
            Self::WeakPassword => Some("Password is too weak. Use at least 6 characters."),
            Self::PopupClosed => Some("Google sign-in was cancelled."),
            Self::Provider(_) => None,
        }
    }
}

/// Failures reported by the hospital lookup backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no hospitals found")]
    NotFound,
    #[error("lookup backend error: {0}")]
    Backend(String),
}

impl LookupError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotFound => "No hospitals found for that location.".to_owned(),
            Self::Backend(detail) => format!("Error: {detail}"),
        }
    }
}
