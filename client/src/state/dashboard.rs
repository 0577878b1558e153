//! Dashboard controller: hospital lookups and their bookkeeping.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard page keeps an `RwSignal<DashboardState>` next to the shared
//! `RwSignal<SessionStore>`. A lookup is `begin` (sync, preceded by
//! `prepare_place` for typed input), the gateway call (async, no signal
//! borrowed), then `settle` (sync), which is the only place a lookup result
//! reaches the store.
//!
//! DESIGN
//! ======
//! Every lookup gets a ticket with a fresh sequence number. A result is
//! applied only when its sequence number is newer than the last applied one,
//! so a slow early response can never overwrite a later one. Loading flags
//! are derived from per-class in-flight counters rather than toggled.
//!
//! ERROR HANDLING
//! ==============
//! A failed lookup leaves the stored result untouched and is reported once
//! through the settlement's notice, unless a newer result has already been
//! applied, in which case it is dropped like any other stale response.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use crate::net::error::{LookupError, ValidationError};
use crate::net::lookup::{LookupGateway, LookupRequest};
use crate::net::types::HospitalResult;
use crate::state::notice::Notice;
use crate::state::session::SessionStore;

/// Which control started a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupKind {
    Place,
    Map,
}

impl LookupKind {
    #[must_use]
    pub fn of(request: &LookupRequest) -> Self {
        match request {
            LookupRequest::Place(_) => Self::Place,
            LookupRequest::Location(_) => Self::Map,
        }
    }
}

/// Handle for one in-flight lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTicket {
    pub seq: u64,
    pub kind: LookupKind,
    /// Place name as submitted, for place lookups.
    place: Option<String>,
}

/// How a finished lookup was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// Finished after a newer result had already been applied; ignored.
    Superseded,
    Failed(LookupError),
}

impl Settlement {
    /// Notice to show for this settlement, if any.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Failed(e) => Some(Notice::failure(e.message())),
            Self::Applied | Self::Superseded => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// Text in the place-name input.
    pub place_input: String,
    pub field_error: Option<ValidationError>,
    /// Class of the most recently started lookup, for button highlighting.
    pub active: Option<LookupKind>,
    /// The location picker is showing.
    pub map_open: bool,
    place_in_flight: u32,
    map_in_flight: u32,
    issued_seq: u64,
    applied_seq: u64,
}

impl DashboardState {
    #[must_use]
    pub fn is_loading(&self, kind: LookupKind) -> bool {
        match kind {
            LookupKind::Place => self.place_in_flight > 0,
            LookupKind::Map => self.map_in_flight > 0,
        }
    }

    /// Validate the place input into a request.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyPlaceName`] for blank input; recorded in `field_error`.
    pub fn prepare_place(&mut self) -> Result<LookupRequest, ValidationError> {
        let name = self.place_input.trim();
        if name.is_empty() {
            self.field_error = Some(ValidationError::EmptyPlaceName);
            return Err(ValidationError::EmptyPlaceName);
        }
        self.field_error = None;
        Ok(LookupRequest::Place(name.to_owned()))
    }

    /// Register `request` as in flight.
    pub fn begin(&mut self, request: &LookupRequest) -> LookupTicket {
        let kind = LookupKind::of(request);
        self.issued_seq += 1;
        *self.in_flight_mut(kind) += 1;
        self.active = Some(kind);
        let place = match request {
            LookupRequest::Place(name) => Some(name.clone()),
            LookupRequest::Location(_) => None,
        };
        LookupTicket { seq: self.issued_seq, kind, place }
    }

    /// Record the outcome of the lookup behind `ticket`.
    pub fn settle(
        &mut self,
        ticket: LookupTicket,
        result: Result<HospitalResult, LookupError>,
        store: &mut SessionStore,
    ) -> Settlement {
        let counter = self.in_flight_mut(ticket.kind);
        *counter = counter.saturating_sub(1);
        if ticket.seq <= self.applied_seq {
            log::debug!("lookup #{} superseded by #{}", ticket.seq, self.applied_seq);
            return Settlement::Superseded;
        }
        match result {
            Err(e) => {
                log::warn!("lookup #{} failed: {e}", ticket.seq);
                Settlement::Failed(e)
            }
            Ok(result) => {
                self.applied_seq = ticket.seq;
                store.replace_hospitals(result);
                // Keep whatever was typed while the request was out.
                if ticket.place.as_deref().is_some_and(|name| self.place_input.trim() == name) {
                    self.place_input.clear();
                }
                Settlement::Applied
            }
        }
    }

    fn in_flight_mut(&mut self, kind: LookupKind) -> &mut u32 {
        match kind {
            LookupKind::Place => &mut self.place_in_flight,
            LookupKind::Map => &mut self.map_in_flight,
        }
    }

    /// Run a whole place lookup against `gateway`.
    ///
    /// # Errors
    ///
    /// Local validation failures; nothing is sent for them.
    pub async fn submit_place<G: LookupGateway>(
        &mut self,
        gateway: &G,
        store: &mut SessionStore,
    ) -> Result<Settlement, ValidationError> {
        let request = self.prepare_place()?;
        let ticket = self.begin(&request);
        let result = request.send(gateway).await;
        Ok(self.settle(ticket, result, store))
    }
}
