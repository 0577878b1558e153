//! Identity gateway: façade over the external identity provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth state machine and the app shell only see [`IdentityGateway`].
//! [`FirebaseIdentity`] implements it against the Firebase Identity Toolkit
//! REST API from the browser; on the server (SSR) every request reports a
//! provider error because these calls only make sense client-side.
//!
//! Session ownership: the gateway's [`SessionChannel`] is the single source of
//! session transitions. Successful sign-in persists and publishes the new
//! session, sign-out clears and publishes `None`, and sign-up publishes
//! nothing (the user logs in explicitly afterwards).
//!
//! ERROR HANDLING
//! ==============
//! Provider error codes are mapped into [`AuthError`] categories; anything
//! unrecognised becomes [`AuthError::Provider`]. No request is retried.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::popup;
use super::session_channel::{SessionChannel, Subscription};
use super::types::Session;
use crate::util::storage;

/// Base URL of the Identity Toolkit REST API.
pub const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// `localStorage` key holding the persisted session.
pub const SESSION_STORAGE_KEY: &str = "hospital-finder.session";

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Operations the client needs from an identity provider.
///
/// Each call is a single logical request; retries are the provider's concern.
/// Futures are not `Send`: the browser runs them with `spawn_local`.
#[allow(async_fn_in_trait)]
pub trait IdentityGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Provider popup flow. Suspends until the popup resolves or is dismissed.
    async fn sign_in_with_popup(&self) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Deliver the current session now and every later change, in order.
    fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static;

    /// Point-in-time snapshot; may lag behind `subscribe` deliveries.
    fn current_session(&self) -> Option<Session>;
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest {
    post_body: String,
    request_uri: String,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    /// Lifetime of `id_token` in seconds, as a decimal string.
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct OobCodeResponse {}

#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(any(test, feature = "hydrate"))]
fn endpoint(action: &str, api_key: &str) -> String {
    format!("{IDENTITY_BASE_URL}/accounts:{action}?key={api_key}")
}

/// Map a provider error code (e.g. `EMAIL_EXISTS`) to the client taxonomy.
///
/// Codes can carry a detail suffix such as
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
pub fn map_provider_error(code: &str) -> AuthError {
    let head = code.split(':').next().unwrap_or(code).trim();
    match head {
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
        "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "WEAK_PASSWORD" => AuthError::WeakPassword,
        _ => AuthError::Provider(code.trim().to_owned()),
    }
}

/// Decode a non-success response body into an [`AuthError`].
#[cfg(any(test, feature = "hydrate"))]
fn parse_error_body(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => map_provider_error(&envelope.error.message),
        Err(_) => AuthError::Provider(format!("identity request failed: {status}")),
    }
}

/// Form body the provider expects for a Google id token exchange.
fn idp_post_body(id_token: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("id_token", id_token)
        .append_pair("providerId", "google.com")
        .finish()
}

fn session_from_token(token: TokenResponse, fallback_email: &str, now_ms: u64) -> Result<Session, AuthError> {
    let lifetime_secs: u64 = token
        .expires_in
        .trim()
        .parse()
        .map_err(|_| AuthError::Provider(format!("invalid token lifetime: {}", token.expires_in)))?;
    Ok(Session {
        uid: token.local_id,
        email: token.email.unwrap_or_else(|| fallback_email.to_owned()),
        display_name: token.display_name.filter(|n| !n.is_empty()),
        id_token: token.id_token,
        refresh_token: token.refresh_token,
        expires_at_ms: now_ms.saturating_add(lifetime_secs.saturating_mul(1000)),
    })
}

// =============================================================================
// FIREBASE IMPLEMENTATION
// =============================================================================

/// Identity gateway backed by the Firebase Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseIdentity {
    api_key: String,
    google_client_id: Option<String>,
    channel: SessionChannel,
}

impl FirebaseIdentity {
    #[must_use]
    pub fn new(api_key: impl Into<String>, google_client_id: Option<String>) -> Self {
        Self { api_key: api_key.into(), google_client_id, channel: SessionChannel::new() }
    }

    /// Re-read the persisted session (page load, or another tab changed it)
    /// and publish it if it differs from the current one.
    pub fn restore(&self) {
        let stored = storage::load_json::<Session>(SESSION_STORAGE_KEY);
        self.reconcile(stored, storage::now_ms());
    }

    /// Adopt `stored` unless it has expired. Returns `true` if a change was
    /// published.
    pub fn reconcile(&self, stored: Option<Session>, now_ms: u64) -> bool {
        let next = match stored {
            Some(session) if session.is_expired(now_ms) => {
                storage::remove(SESSION_STORAGE_KEY);
                None
            }
            other => other,
        };
        if self.channel.current() == next {
            return false;
        }
        match next {
            Some(session) => {
                log::info!("session restored for {}", session.uid);
                self.schedule_expiry(&session);
                self.channel.publish(Some(session));
            }
            None => {
                log::info!("session cleared");
                self.channel.publish(None);
            }
        }
        true
    }

    /// Publish `None` if the current session's token has expired.
    pub fn expire_if_stale(&self, now_ms: u64) -> bool {
        match self.channel.current() {
            Some(session) if session.is_expired(now_ms) => {
                log::info!("session expired for {}", session.uid);
                self.forget();
                true
            }
            _ => false,
        }
    }

    fn adopt(&self, session: &Session) {
        storage::save_json(SESSION_STORAGE_KEY, session);
        self.schedule_expiry(session);
        self.channel.publish(Some(session.clone()));
    }

    fn forget(&self) {
        storage::remove(SESSION_STORAGE_KEY);
        self.channel.publish(None);
    }

    fn schedule_expiry(&self, session: &Session) {
        #[cfg(feature = "hydrate")]
        {
            let delay_ms = session.expires_at_ms.saturating_sub(storage::now_ms());
            let delay_ms = u32::try_from(delay_ms).unwrap_or(u32::MAX);
            let this = self.clone();
            gloo_timers::callback::Timeout::new(delay_ms, move || {
                this.expire_if_stale(storage::now_ms());
            })
            .forget();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
        }
    }

    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        #[cfg(feature = "hydrate")]
        {
            let url = endpoint(action, &self.api_key);
            let resp = gloo_net::http::Request::post(&url)
                .json(body)
                .map_err(|e| AuthError::Provider(e.to_string()))?
                .send()
                .await
                .map_err(|e| AuthError::Provider(e.to_string()))?;
            let text = resp.text().await.map_err(|e| AuthError::Provider(e.to_string()))?;
            if !resp.ok() {
                return Err(parse_error_body(resp.status(), &text));
            }
            serde_json::from_str(&text).map_err(|e| AuthError::Provider(format!("unexpected response: {e}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (action, body, &self.api_key);
            Err(AuthError::Provider("not available on server".to_owned()))
        }
    }

    async fn password_session(&self, action: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = PasswordRequest { email, password, return_secure_token: true };
        let token: TokenResponse = self.call(action, &request).await?;
        session_from_token(token, email, storage::now_ms())
    }
}

impl IdentityGateway for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .password_session("signInWithPassword", email, password)
            .await
            .inspect_err(|e| log::warn!("sign-in failed: {e}"))?;
        self.adopt(&session);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.password_session("signUp", email, password)
            .await
            .inspect_err(|e| log::warn!("sign-up failed: {e}"))
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let request = OobCodeRequest { request_type: "PASSWORD_RESET", email };
        let _: OobCodeResponse = self
            .call("sendOobCode", &request)
            .await
            .inspect_err(|e| log::warn!("password reset failed: {e}"))?;
        Ok(())
    }

    async fn sign_in_with_popup(&self) -> Result<Session, AuthError> {
        let Some(client_id) = self.google_client_id.as_deref() else {
            return Err(AuthError::Provider("Google sign-in is not configured".to_owned()));
        };
        let credential = popup::google_credential(client_id).await?;
        let request = IdpRequest {
            post_body: idp_post_body(&credential.id_token),
            request_uri: credential.request_uri,
            return_secure_token: true,
            return_idp_credential: true,
        };
        let token: TokenResponse = self
            .call("signInWithIdp", &request)
            .await
            .inspect_err(|e| log::warn!("google sign-in failed: {e}"))?;
        let session = session_from_token(token, "", storage::now_ms())?;
        self.adopt(&session);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // Tokens are bearer credentials held only by this client; dropping
        // them is the sign-out.
        self.forget();
        Ok(())
    }

    fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        self.channel.subscribe(on_change)
    }

    fn current_session(&self) -> Option<Session> {
        self.channel.current()
    }
}
