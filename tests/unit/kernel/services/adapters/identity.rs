use super::*;
use crate::kernel::services::ports::AuthSettings;

fn gate() -> StaticTokenGate {
    let mut auth = AuthSettings::default();
    auth.tokens.insert("secret".to_string(), "alice".to_string());
    StaticTokenGate::from_settings(&auth)
}

#[test]
fn bearer_and_raw_tokens_resolve_to_owner() {
    let gate = gate();
    assert_eq!(gate.verify(Some("Bearer secret")), Ok(OwnerId::new("alice")));
    assert_eq!(gate.verify(Some("bearer secret")), Ok(OwnerId::new("alice")));
    assert_eq!(gate.verify(Some("  secret ")), Ok(OwnerId::new("alice")));
}

#[test]
fn missing_empty_or_unknown_credentials_are_rejected() {
    let gate = gate();
    assert_eq!(gate.verify(None), Err(Unauthenticated));
    assert_eq!(gate.verify(Some("")), Err(Unauthenticated));
    assert_eq!(gate.verify(Some("Bearer ")), Err(Unauthenticated));
    assert_eq!(gate.verify(Some("Bearer nope")), Err(Unauthenticated));
}

#[test]
fn empty_gate_rejects_everything() {
    let gate = StaticTokenGate::new();
    assert!(gate.is_empty());
    assert_eq!(gate.verify(Some("Bearer secret")), Err(Unauthenticated));
}
