//! Blob identifiers, payloads and write receipts.

use crate::error::{Error, Result};
use crate::request::EpochCount;
use crate::units::Mist;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted length of a blob identifier.
pub const MAX_BLOB_ID_LEN: usize = 256;

/// Opaque handle minted by the network for a stored blob.
///
/// Only checked to be safe inside a URL path segment; the network owns its
/// structure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobId(String);

impl BlobId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidBlobId("blob id must not be empty".to_string()));
        }
        if id.len() > MAX_BLOB_ID_LEN {
            return Err(Error::InvalidBlobId(format!(
                "blob id longer than {MAX_BLOB_ID_LEN} characters"
            )));
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(Error::InvalidBlobId(format!(
                "blob id contains characters outside [A-Za-z0-9_-]: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BlobId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<BlobId> for String {
    fn from(value: BlobId) -> Self {
        value.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File contents paired with the caller's name for them.
#[derive(Clone, Debug)]
pub struct BlobPayload {
    /// Human-readable identifier, usually the uploaded filename.
    pub identifier: String,
    pub contents: Bytes,
}

impl BlobPayload {
    pub fn new(identifier: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        Self {
            identifier: identifier.into(),
            contents: contents.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Retention settings applied to a write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WritePolicy {
    pub epochs: EpochCount,
    pub deletable: bool,
    /// Address that should own the resulting blob object, if any.
    pub owner: Option<String>,
}

/// Outcome of a successful write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReceipt {
    pub blob_id: BlobId,
    pub identifier: String,
    pub size_bytes: u64,
    pub epochs: EpochCount,
    pub deletable: bool,
    /// Last epoch the blob is guaranteed to be stored, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_epoch: Option<u64>,
    /// Amount charged for the write, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Mist>,
    /// The network's receipt, passed through untouched.
    pub receipt: serde_json::Value,
}
