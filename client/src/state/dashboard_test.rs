use std::cell::RefCell;
use std::collections::VecDeque;

use futures::channel::oneshot;
use futures::executor::block_on;

use super::*;
use crate::net::types::Coordinates;

type Reply = Result<HospitalResult, LookupError>;

/// Lookup backend whose replies are fed through oneshot channels, in call order.
#[derive(Default)]
struct FakeLookup {
    calls: RefCell<Vec<LookupRequest>>,
    replies: RefCell<VecDeque<oneshot::Receiver<Reply>>>,
}

impl FakeLookup {
    fn queue(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(rx);
        tx
    }

    async fn reply(&self, request: LookupRequest) -> Reply {
        self.calls.borrow_mut().push(request);
        let rx = self.replies.borrow_mut().pop_front();
        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(LookupError::Backend("dropped".to_owned()))),
            None => Err(LookupError::Backend("no reply queued".to_owned())),
        }
    }
}

impl LookupGateway for FakeLookup {
    async fn resolve_by_place_name(&self, name: &str) -> Result<HospitalResult, LookupError> {
        self.reply(LookupRequest::Place(name.to_owned())).await
    }

    async fn resolve_by_coordinates(&self, coords: Coordinates) -> Result<HospitalResult, LookupError> {
        self.reply(LookupRequest::Location(coords)).await
    }
}

fn summary(text: &str) -> HospitalResult {
    HospitalResult::Summary(text.to_owned())
}

fn place(name: &str) -> LookupRequest {
    LookupRequest::Place(name.to_owned())
}

fn map() -> LookupRequest {
    LookupRequest::Location(Coordinates::new(1.0, 2.0).unwrap())
}

// =============================================================
// Place input
// =============================================================

#[test]
fn empty_place_is_rejected_locally() {
    let mut state = DashboardState { place_input: "   ".to_owned(), ..DashboardState::default() };
    assert_eq!(state.prepare_place(), Err(ValidationError::EmptyPlaceName));
    assert_eq!(state.field_error, Some(ValidationError::EmptyPlaceName));
    assert!(!state.is_loading(LookupKind::Place));
}

#[test]
fn empty_place_submission_calls_nothing() {
    let lookup = FakeLookup::default();
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let result = block_on(state.submit_place(&lookup, &mut store));
    assert_eq!(result, Err(ValidationError::EmptyPlaceName));
    assert!(lookup.calls.borrow().is_empty());
}

#[test]
fn prepare_place_trims_input() {
    let mut state = DashboardState { place_input: "  Boston ".to_owned(), ..DashboardState::default() };
    assert_eq!(state.prepare_place(), Ok(LookupRequest::Place("Boston".to_owned())));
}

// =============================================================
// Loading flags
// =============================================================

#[test]
fn loading_flags_are_per_class() {
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let place_ticket = state.begin(&place("a"));
    let map_ticket = state.begin(&map());
    assert!(state.is_loading(LookupKind::Place));
    assert!(state.is_loading(LookupKind::Map));
    assert_eq!(state.active, Some(LookupKind::Map));

    state.settle(map_ticket, Ok(summary("m")), &mut store);
    assert!(state.is_loading(LookupKind::Place));
    assert!(!state.is_loading(LookupKind::Map));

    state.settle(place_ticket, Err(LookupError::NotFound), &mut store);
    assert!(!state.is_loading(LookupKind::Place));
}

#[test]
fn flag_clears_only_after_last_request_of_class() {
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let first = state.begin(&place("a"));
    let second = state.begin(&place("b"));
    state.settle(first, Ok(summary("a")), &mut store);
    assert!(state.is_loading(LookupKind::Place));
    state.settle(second, Ok(summary("b")), &mut store);
    assert!(!state.is_loading(LookupKind::Place));
}

// =============================================================
// Settlement
// =============================================================

#[test]
fn failure_retains_previous_result_and_reports_once() {
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let ok = state.begin(&place("Boston"));
    state.settle(ok, Ok(summary("City Hospital")), &mut store);

    let bad = state.begin(&map());
    let settlement = state.settle(bad, Err(LookupError::Backend("boom".to_owned())), &mut store);

    assert_eq!(settlement.notice(), Some(Notice::failure("Error: boom")));
    assert_eq!(store.hospitals(), Some(&summary("City Hospital")));
}

#[test]
fn not_found_notice_text() {
    assert_eq!(
        Settlement::Failed(LookupError::NotFound).notice(),
        Some(Notice::failure("No hospitals found for that location."))
    );
    assert_eq!(Settlement::Applied.notice(), None);
}

#[test]
fn out_of_order_results_keep_the_newer_one() {
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let older = state.begin(&place("Springfield"));
    let newer = state.begin(&map());

    assert_eq!(state.settle(newer, Ok(summary("newer")), &mut store), Settlement::Applied);
    assert_eq!(state.settle(older, Ok(summary("older")), &mut store), Settlement::Superseded);

    assert_eq!(store.hospitals(), Some(&summary("newer")));
    assert!(!state.is_loading(LookupKind::Place));
}

#[test]
fn stale_failure_is_ignored_after_newer_result() {
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let older = state.begin(&place("Springfield"));
    let newer = state.begin(&map());
    state.settle(newer, Ok(summary("fresh")), &mut store);

    let late = state.settle(older, Err(LookupError::Backend("timeout".to_owned())), &mut store);

    assert_eq!(late, Settlement::Superseded);
    assert_eq!(late.notice(), None);
    assert_eq!(store.hospitals(), Some(&summary("fresh")));
    assert!(!state.is_loading(LookupKind::Place));
}

#[test]
fn newer_failure_still_reports_over_older_success() {
    let mut state = DashboardState::default();
    let mut store = SessionStore::default();
    let older = state.begin(&place("Springfield"));
    let newer = state.begin(&map());
    state.settle(older, Ok(summary("old")), &mut store);

    let settlement = state.settle(newer, Err(LookupError::NotFound), &mut store);

    assert_eq!(settlement, Settlement::Failed(LookupError::NotFound));
    assert_eq!(store.hospitals(), Some(&summary("old")));
}

#[test]
fn out_of_order_responses_through_gateway() {
    let lookup = FakeLookup::default();
    let slow_tx = lookup.queue();
    let fast_tx = lookup.queue();
    let state = RefCell::new(DashboardState::default());
    let store = RefCell::new(SessionStore::default());
    let (done_tx, done_rx) = oneshot::channel::<()>();

    let (slow, fast, ()) = block_on(async {
        let slow_ticket = state.borrow_mut().begin(&place("Springfield"));
        let fast_ticket = state.borrow_mut().begin(&map());
        let slow = async {
            let result = place("Springfield").send(&lookup).await;
            state.borrow_mut().settle(slow_ticket, result, &mut store.borrow_mut())
        };
        let fast = async {
            let result = map().send(&lookup).await;
            let settlement = state.borrow_mut().settle(fast_ticket, result, &mut store.borrow_mut());
            done_tx.send(()).unwrap();
            settlement
        };
        let driver = async {
            fast_tx.send(Ok(summary("from map"))).unwrap();
            done_rx.await.unwrap();
            slow_tx.send(Ok(summary("from place"))).unwrap();
        };
        futures::join!(slow, fast, driver)
    });

    assert_eq!(fast, Settlement::Applied);
    assert_eq!(slow, Settlement::Superseded);
    assert_eq!(store.borrow().hospitals(), Some(&summary("from map")));
    assert!(!state.borrow().is_loading(LookupKind::Place));
    assert!(!state.borrow().is_loading(LookupKind::Map));
}

#[test]
fn boston_place_lookup_stores_summary() {
    let lookup = FakeLookup::default();
    lookup.queue().send(Ok(summary("City Hospital\nPhone: 555-1234"))).unwrap();
    let mut state = DashboardState { place_input: "Boston".to_owned(), ..DashboardState::default() };
    let mut store = SessionStore::default();

    let settlement = block_on(state.submit_place(&lookup, &mut store)).unwrap();

    assert_eq!(settlement, Settlement::Applied);
    assert_eq!(*lookup.calls.borrow(), vec![LookupRequest::Place("Boston".to_owned())]);
    assert_eq!(store.hospitals(), Some(&summary("City Hospital\nPhone: 555-1234")));
    assert!(!state.is_loading(LookupKind::Place));
    assert!(state.place_input.is_empty());
}

#[test]
fn input_typed_during_lookup_survives_the_result() {
    let mut state = DashboardState { place_input: "Boston".to_owned(), ..DashboardState::default() };
    let mut store = SessionStore::default();
    let request = state.prepare_place().unwrap();
    let ticket = state.begin(&request);
    state.place_input = "Cambridge".to_owned();

    assert_eq!(state.settle(ticket, Ok(summary("City Hospital")), &mut store), Settlement::Applied);
    assert_eq!(state.place_input, "Cambridge");
}

#[test]
fn map_result_leaves_place_input_alone() {
    let mut state = DashboardState { place_input: "Boston".to_owned(), ..DashboardState::default() };
    let mut store = SessionStore::default();
    let ticket = state.begin(&map());
    state.settle(ticket, Ok(summary("Near you")), &mut store);
    assert_eq!(state.place_input, "Boston");
}

#[test]
fn failed_place_lookup_keeps_input() {
    let lookup = FakeLookup::default();
    lookup.queue().send(Err(LookupError::NotFound)).unwrap();
    let mut state = DashboardState { place_input: "Atlantis".to_owned(), ..DashboardState::default() };
    let mut store = SessionStore::default();

    let settlement = block_on(state.submit_place(&lookup, &mut store)).unwrap();

    assert_eq!(settlement, Settlement::Failed(LookupError::NotFound));
    assert_eq!(state.place_input, "Atlantis");
    assert!(store.hospitals().is_none());
}
