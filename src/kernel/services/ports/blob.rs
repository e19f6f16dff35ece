use crate::models::BlobRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob `{0}` not found")]
    NotFound(BlobRef),
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// Binary payload storage. Release is best-effort: callers log failures and
/// carry on removing the node that referenced the blob.
pub trait BlobStore: Send + Sync {
    fn release(&self, blob: &BlobRef) -> Result<(), BlobError>;
}
