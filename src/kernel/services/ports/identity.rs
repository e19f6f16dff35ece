use crate::models::OwnerId;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Unauthorized")]
pub struct Unauthenticated;

/// Turns request credentials into a stable owner id.
///
/// `credentials` is the raw `Authorization` header value, if any.
pub trait IdentityGate: Send + Sync {
    fn verify(&self, credentials: Option<&str>) -> Result<OwnerId, Unauthenticated>;
}
