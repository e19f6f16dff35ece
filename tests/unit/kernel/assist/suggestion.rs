use super::*;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn request() -> Option<SuggestionRequest> {
    Some(SuggestionRequest {
        file_name: "a.rs".to_string(),
        ..SuggestionRequest::default()
    })
}

#[test]
fn nothing_fires_before_the_quiet_period() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);

    assert!(session.is_waiting());
    assert_eq!(session.deadline(), Some(t0 + DEBOUNCE));
    assert!(session.poll(t0 + Duration::from_millis(299), request).is_none());
    assert!(session.poll(t0 + DEBOUNCE, request).is_some());
    assert!(matches!(session.phase(), SuggestionPhase::Awaiting { .. }));
}

#[test]
fn each_change_restarts_the_debounce() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    session.on_change(t0 + Duration::from_millis(200));

    assert!(session.poll(t0 + Duration::from_millis(400), request).is_none());
    assert!(session.poll(t0 + Duration::from_millis(500), request).is_some());
}

#[test]
fn response_renders_and_accept_takes_it() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    let pending = session.poll(t0 + DEBOUNCE, request).unwrap();

    assert!(session.visible().is_none());
    assert!(session.apply(pending.ticket, Some("x + 1".to_string())));
    assert_eq!(session.visible(), Some("x + 1"));

    assert_eq!(session.accept().as_deref(), Some("x + 1"));
    assert!(session.visible().is_none());
    assert!(matches!(session.phase(), SuggestionPhase::Idle));
    assert!(session.accept().is_none());
}

#[test]
fn superseded_response_is_ignored() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    let first = session.poll(t0 + DEBOUNCE, request).unwrap();

    let t1 = t0 + Duration::from_millis(400);
    session.on_change(t1);
    assert!(first.cancel.is_cancelled());
    let second = session.poll(t1 + DEBOUNCE, request).unwrap();

    assert!(!session.apply(first.ticket, Some("stale".to_string())));
    assert!(session.visible().is_none());

    assert!(session.apply(second.ticket, Some("fresh".to_string())));
    assert_eq!(session.visible(), Some("fresh"));
}

#[test]
fn late_response_after_change_is_ignored() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    let pending = session.poll(t0 + DEBOUNCE, request).unwrap();

    session.on_change(t0 + Duration::from_millis(350));
    assert!(!session.apply(pending.ticket, Some("late".to_string())));
    assert!(matches!(session.phase(), SuggestionPhase::Debouncing { .. }));
}

#[test]
fn empty_or_failed_response_renders_nothing() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    let pending = session.poll(t0 + DEBOUNCE, request).unwrap();
    assert!(session.apply(pending.ticket, Some(String::new())));
    assert!(session.visible().is_none());
    assert!(session.accept().is_none());

    session.on_change(t0 + Duration::from_secs(1));
    let pending = session.poll(t0 + Duration::from_secs(2), request).unwrap();
    assert!(session.apply(pending.ticket, None));
    assert!(session.visible().is_none());
}

#[test]
fn blank_document_clears_without_request() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    assert!(session.poll(t0 + DEBOUNCE, || None).is_none());
    assert!(matches!(session.phase(), SuggestionPhase::Idle));
    assert!(!session.is_waiting());
}

#[test]
fn teardown_aborts_the_live_request() {
    let t0 = Instant::now();
    let mut session = SuggestionSession::new(DEBOUNCE);
    session.on_change(t0);
    let pending = session.poll(t0 + DEBOUNCE, request).unwrap();

    session.teardown();
    assert!(pending.cancel.is_cancelled());
    assert!(!session.apply(pending.ticket, Some("x".to_string())));
}
