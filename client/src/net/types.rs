//! Shared data types for the identity and lookup boundaries.
//!
//! DESIGN
//! ======
//! These types are the only shapes the state machines see. Wire-level DTOs
//! for each external service stay private to their gateway module and are
//! converted into these at the boundary.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

// =============================================================================
// SESSION
// =============================================================================

/// The authenticated user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque provider identity handle.
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Provider-issued bearer token.
    pub id_token: String,
    pub refresh_token: String,
    /// Unix epoch milliseconds after which `id_token` is no longer valid.
    pub expires_at_ms: u64,
}

impl Session {
    /// Name shown in the dashboard header.
    #[must_use]
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "User",
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

// =============================================================================
// HOSPITAL RESULTS
// =============================================================================

/// One hospital record returned by the structured backend variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Result of a hospital lookup. The backend answers with either a free-text
/// summary or a list of records.
#[derive(Clone, Debug, PartialEq)]
pub enum HospitalResult {
    Summary(String),
    Hospitals(Vec<Hospital>),
}

impl HospitalResult {
    /// Split a summary into display blocks (separated by blank lines), each a
    /// list of non-empty lines. Record results yield one block per hospital.
    #[must_use]
    pub fn blocks(&self) -> Vec<Vec<String>> {
        match self {
            Self::Summary(text) => text
                .split("\n\n")
                .map(|block| {
                    block
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_owned)
                        .collect::<Vec<_>>()
                })
                .filter(|block| !block.is_empty())
                .collect(),
            Self::Hospitals(items) => items.iter().map(Hospital::lines).collect(),
        }
    }
}

impl Hospital {
    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if let Some(address) = &self.formatted_address {
            lines.push(format!("Address: {address}"));
        }
        if let Some(phone) = &self.phone {
            lines.push(format!("Phone: {phone}"));
        }
        if let Some(rating) = self.rating {
            lines.push(format!("Rating: {rating:.1}"));
        }
        if let Some(website) = &self.website {
            lines.push(format!("Website: {website}"));
        }
        lines
    }
}

// =============================================================================
// COORDINATES
// =============================================================================

/// A location picked on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCoordinates`] when either component
    /// is NaN/infinite or outside ±90 / ±180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lng_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if lat_ok && lng_ok {
            Ok(Self { latitude, longitude })
        } else {
            Err(ValidationError::InvalidCoordinates)
        }
    }

    /// Wire form expected by the lookup backend: `"lat,lng"`.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}
