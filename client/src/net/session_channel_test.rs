use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn session(uid: &str) -> Session {
    Session {
        uid: uid.to_owned(),
        email: format!("{uid}@example.com"),
        display_name: None,
        id_token: "tok".to_owned(),
        refresh_token: "ref".to_owned(),
        expires_at_ms: u64::MAX,
    }
}

fn recorder() -> (Arc<Mutex<Vec<Option<String>>>>, impl Fn(Option<&Session>) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = move |s: Option<&Session>| sink.lock().unwrap().push(s.map(|s| s.uid.clone()));
    (seen, listener)
}

#[test]
fn subscribe_delivers_current_immediately() {
    let channel = SessionChannel::new();
    channel.publish(Some(session("u1")));
    let (seen, listener) = recorder();
    let _sub = channel.subscribe(listener);
    assert_eq!(*seen.lock().unwrap(), vec![Some("u1".to_owned())]);
}

#[test]
fn subscribe_on_empty_channel_delivers_none() {
    let channel = SessionChannel::new();
    let (seen, listener) = recorder();
    let _sub = channel.subscribe(listener);
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[test]
fn changes_arrive_in_publish_order_without_coalescing() {
    let channel = SessionChannel::new();
    let (seen, listener) = recorder();
    let _sub = channel.subscribe(listener);
    channel.publish(Some(session("u1")));
    channel.publish(None);
    channel.publish(Some(session("u2")));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![None, Some("u1".to_owned()), None, Some("u2".to_owned())]
    );
    assert_eq!(channel.current().map(|s| s.uid), Some("u2".to_owned()));
}

#[test]
fn reentrant_publish_is_queued_not_nested() {
    let channel = SessionChannel::new();
    let depth = Arc::new(AtomicUsize::new(0));
    let max_depth = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let inner_channel = channel.clone();
    let (d, m, o) = (Arc::clone(&depth), Arc::clone(&max_depth), Arc::clone(&order));
    let _sub = channel.subscribe(move |s| {
        let now = d.fetch_add(1, Ordering::SeqCst) + 1;
        m.fetch_max(now, Ordering::SeqCst);
        let uid = s.map(|s| s.uid.clone());
        o.lock().unwrap().push(uid.clone());
        // Signing in as u1 immediately expires the session.
        if uid.as_deref() == Some("u1") {
            inner_channel.publish(None);
        }
        d.fetch_sub(1, Ordering::SeqCst);
    });

    channel.publish(Some(session("u1")));

    assert_eq!(max_depth.load(Ordering::SeqCst), 1);
    assert_eq!(*order.lock().unwrap(), vec![None, Some("u1".to_owned()), None]);
    assert!(channel.current().is_none());
}

#[test]
fn unsubscribe_stops_delivery() {
    let channel = SessionChannel::new();
    let (seen, listener) = recorder();
    let sub = channel.subscribe(listener);
    assert_eq!(channel.listener_count(), 1);
    sub.unsubscribe();
    channel.publish(Some(session("u1")));
    assert_eq!(*seen.lock().unwrap(), vec![None]);
    assert_eq!(channel.listener_count(), 0);
}

#[test]
fn subscribe_from_callback_replays_after_current_delivery() {
    let channel = SessionChannel::new();
    let (late_seen, late_listener) = recorder();
    let late_listener = Arc::new(late_listener);
    let subscribed = Arc::new(AtomicUsize::new(0));

    let inner_channel = channel.clone();
    let flag = Arc::clone(&subscribed);
    let _sub = channel.subscribe(move |s| {
        if s.is_some() && flag.fetch_add(1, Ordering::SeqCst) == 0 {
            let l = Arc::clone(&late_listener);
            let _late = inner_channel.subscribe(move |s| l(s));
        }
    });

    channel.publish(Some(session("u1")));
    channel.publish(None);

    assert_eq!(*late_seen.lock().unwrap(), vec![Some("u1".to_owned()), None]);
}

#[test]
fn subscriber_added_mid_drain_sees_queued_change_once() {
    let channel = SessionChannel::new();
    channel.publish(Some(session("u1")));
    let (late_seen, late_listener) = recorder();
    let late_listener = Arc::new(late_listener);
    let subscribed = Arc::new(AtomicUsize::new(0));

    let inner_channel = channel.clone();
    let flag = Arc::clone(&subscribed);
    let _sub = channel.subscribe(move |s| {
        // The first delivery signs out, then attaches a second listener.
        if s.is_some() && flag.fetch_add(1, Ordering::SeqCst) == 0 {
            inner_channel.publish(None);
            let l = Arc::clone(&late_listener);
            let _late = inner_channel.subscribe(move |s| l(s));
        }
    });

    assert_eq!(*late_seen.lock().unwrap(), vec![None]);

    channel.publish(Some(session("u2")));
    assert_eq!(*late_seen.lock().unwrap(), vec![None, Some("u2".to_owned())]);
}
