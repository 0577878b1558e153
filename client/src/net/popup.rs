//! Google sign-in popup (OAuth implicit flow).
//!
//! SYSTEM CONTEXT
//! ==============
//! The opener window builds the Google authorization URL, opens it in a
//! popup, and polls the popup until Google redirects it back to the
//! same-origin landing page served by the server at [`POPUP_PATH`]. The id
//! token is then read from the popup's URL fragment and handed to the
//! identity provider. Closing the popup ends the wait with
//! [`AuthError::PopupClosed`].

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "popup_test.rs"]
mod popup_test;

use super::error::AuthError;

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Same-origin page the popup lands on after Google redirects back.
pub const POPUP_PATH: &str = "/auth/popup";

#[cfg(feature = "hydrate")]
const POLL_INTERVAL_MS: u64 = 250;

/// Google credential captured from the popup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupCredential {
    pub id_token: String,
    /// Redirect URI the token was issued for; the identity provider checks it.
    pub request_uri: String,
}

/// Build the authorization URL for the implicit `id_token` flow.
///
/// # Errors
///
/// Returns [`AuthError::Provider`] if the parameters do not form a valid URL.
pub fn authorize_url(client_id: &str, redirect_uri: &str, nonce: &str) -> Result<String, AuthError> {
    let url = url::Url::parse_with_params(
        GOOGLE_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "id_token"),
            ("scope", "openid email profile"),
            ("nonce", nonce),
            ("state", nonce),
            ("prompt", "select_account"),
        ],
    )
    .map_err(|e| AuthError::Provider(format!("authorize url: {e}")))?;
    Ok(url.into())
}

/// Interpret the popup's URL fragment.
///
/// Returns `None` while the fragment carries neither a token nor an error,
/// i.e. the popup has not finished the Google round trip yet.
pub fn parse_fragment(fragment: &str, expected_state: &str) -> Option<Result<String, AuthError>> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut id_token = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "id_token" => id_token = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Some(Err(match error.as_str() {
            "access_denied" | "popup_closed_by_user" => AuthError::PopupClosed,
            other => AuthError::Provider(format!("google sign-in: {other}")),
        }));
    }
    let id_token = id_token?;
    if state.as_deref() != Some(expected_state) {
        return Some(Err(AuthError::Provider("google sign-in: state mismatch".to_owned())));
    }
    Some(Ok(id_token))
}

/// Open the Google popup and wait for it to hand back an id token.
///
/// # Errors
///
/// [`AuthError::PopupClosed`] if the user closes or denies the popup,
/// [`AuthError::Provider`] if it cannot be opened.
pub async fn google_credential(client_id: &str) -> Result<PopupCredential, AuthError> {
    #[cfg(feature = "hydrate")]
    {
        let js_err = |e: wasm_bindgen::JsValue| AuthError::Provider(format!("{e:?}"));
        let window = web_sys::window().ok_or_else(|| AuthError::Provider("no window".to_owned()))?;
        let origin = window.location().origin().map_err(js_err)?;
        let request_uri = format!("{origin}{POPUP_PATH}");
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let url = authorize_url(client_id, &request_uri, &nonce)?;

        let popup = window
            .open_with_url_and_target_and_features(&url, "google-signin", "width=500,height=640")
            .map_err(js_err)?
            .ok_or_else(|| AuthError::Provider("popup blocked".to_owned()))?;

        loop {
            gloo_timers::future::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
            if popup.closed().unwrap_or(true) {
                return Err(AuthError::PopupClosed);
            }
            // Reading the location throws while the popup is on Google's origin.
            let Ok(hash) = popup.location().hash() else {
                continue;
            };
            if let Some(outcome) = parse_fragment(&hash, &nonce) {
                let _ = popup.close();
                return outcome.map(|id_token| PopupCredential { id_token, request_uri });
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = client_id;
        Err(AuthError::Provider("not available on server".to_owned()))
    }
}
