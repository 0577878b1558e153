use super::*;

#[test]
fn push_assigns_increasing_ids() {
    let mut state = NoticeState::default();
    let first = state.push(Notice::success("a"));
    let second = state.push(Notice::failure("b"));
    assert!(second > first);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].1.kind, NoticeKind::Failure);
}

#[test]
fn dismiss_removes_only_matching_notice() {
    let mut state = NoticeState::default();
    let first = state.push(Notice::success("a"));
    let second = state.push(Notice::success("b"));
    state.dismiss(first);
    assert_eq!(state.items.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![second]);
}

#[test]
fn dismiss_unknown_id_is_noop() {
    let mut state = NoticeState::default();
    state.push(Notice::success("a"));
    state.dismiss(99);
    assert_eq!(state.items.len(), 1);
}

#[test]
fn kind_class_names() {
    assert_eq!(NoticeKind::Success.class(), "notice--success");
    assert_eq!(NoticeKind::Failure.class(), "notice--failure");
}
