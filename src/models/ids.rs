//! Identifiers shared by the workspace store, tab sessions and the HTTP surface.
//!
//! Project and node ids are slotmap keys: any backend can mint them from a `u64`
//! token, and a removed key never aliases a later insertion.

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use slotmap::{new_key_type, Key, KeyData};
use std::fmt;

new_key_type! {
    pub struct ProjectId;
    pub struct NodeId;
}

macro_rules! key_token {
    ($($ty:ident),* $(,)?) => {$(
        impl $ty {
            pub fn token(self) -> u64 {
                self.data().as_ffi()
            }

            pub fn from_token(raw: u64) -> Self {
                KeyData::from_ffi(raw).into()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.token())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u64(self.token())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                u64::deserialize(deserializer).map(Self::from_token)
            }
        }
    )*};
}

key_token!(ProjectId, NodeId);

/// Stable user identifier produced by the identity gate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(CompactString);

impl OwnerId {
    pub fn new(raw: impl Into<CompactString>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to a binary payload held by the blob store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(CompactString);

impl BlobRef {
    pub fn new(raw: impl Into<CompactString>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/ids.rs"]
mod tests;
