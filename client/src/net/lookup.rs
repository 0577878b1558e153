//! Lookup gateway: façade over the hospital lookup backend.
//!
//! The backend exposes two JSON endpoints under a configured base URL:
//! `POST {base}/place` with `{"place_name": ...}` and `POST {base}/location`
//! with `{"location": "lat,lng"}`. Both answer with either `{"summary": ...}`
//! or `{"hospital_details": [...]}`.
//!
//! ERROR HANDLING
//! ==============
//! Any non-success status is [`LookupError::Backend`], as are transport
//! failures and undecodable bodies. A successful answer carrying neither a
//! summary nor hospital records is [`LookupError::NotFound`]. Nothing is
//! cached or retried.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "lookup_test.rs"]
mod lookup_test;

use serde::{Deserialize, Serialize};

use super::error::LookupError;
use super::types::{Coordinates, Hospital, HospitalResult};

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Operations the dashboard needs from the lookup backend.
#[allow(async_fn_in_trait)]
pub trait LookupGateway {
    async fn resolve_by_place_name(&self, name: &str) -> Result<HospitalResult, LookupError>;

    async fn resolve_by_coordinates(&self, coords: Coordinates) -> Result<HospitalResult, LookupError>;
}

/// One lookup as issued by the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupRequest {
    Place(String),
    Location(Coordinates),
}

impl LookupRequest {
    /// Send this request through `gateway`.
    ///
    /// # Errors
    ///
    /// Propagates the gateway's [`LookupError`] unchanged.
    pub async fn send<G: LookupGateway>(&self, gateway: &G) -> Result<HospitalResult, LookupError> {
        match self {
            Self::Place(name) => gateway.resolve_by_place_name(name).await,
            Self::Location(coords) => gateway.resolve_by_coordinates(*coords).await,
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct PlaceBody<'a> {
    place_name: &'a str,
}

#[derive(Debug, Serialize)]
struct LocationBody {
    location: String,
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    hospital_details: Option<Vec<Hospital>>,
}

/// Interpret a backend response given its HTTP status and raw body.
///
/// # Errors
///
/// See the module-level error policy.
pub fn parse_response(status: u16, body: &str) -> Result<HospitalResult, LookupError> {
    if !(200..300).contains(&status) {
        return Err(LookupError::Backend(format!("Failed to fetch hospital details (status {status})")));
    }
    let parsed: LookupResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Backend(format!("invalid response: {e}")))?;
    if let Some(details) = parsed.hospital_details.filter(|d| !d.is_empty()) {
        return Ok(HospitalResult::Hospitals(details));
    }
    match parsed.summary {
        Some(summary) if !summary.trim().is_empty() => Ok(HospitalResult::Summary(summary)),
        _ => Err(LookupError::NotFound),
    }
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

/// Lookup gateway posting JSON to the configured backend.
#[derive(Clone, Debug)]
pub struct HttpLookup {
    base_url: String,
}

impl HttpLookup {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn place_url(&self) -> String {
        format!("{}/place", self.base_url)
    }

    #[must_use]
    pub fn location_url(&self) -> String {
        format!("{}/location", self.base_url)
    }

    async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<HospitalResult, LookupError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(url)
                .json(body)
                .map_err(|e| LookupError::Backend(e.to_string()))?
                .send()
                .await
                .map_err(|e| LookupError::Backend(e.to_string()))?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| LookupError::Backend(e.to_string()))?;
            parse_response(status, &text).inspect_err(|e| log::warn!("lookup {url} failed: {e}"))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, body);
            Err(LookupError::Backend("not available on server".to_owned()))
        }
    }
}

impl LookupGateway for HttpLookup {
    async fn resolve_by_place_name(&self, name: &str) -> Result<HospitalResult, LookupError> {
        self.post(&self.place_url(), &PlaceBody { place_name: name }).await
    }

    async fn resolve_by_coordinates(&self, coords: Coordinates) -> Result<HospitalResult, LookupError> {
        self.post(&self.location_url(), &LocationBody { location: coords.to_query() }).await
    }
}
