//! Typed, validated request values.
//!
//! Query parameters arrive as strings. They are parsed once, here, into
//! `ByteSize` and `EpochCount`; business logic never sees raw strings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};

/// Epochs used when the caller does not specify a duration.
pub const DEFAULT_EPOCHS: u32 = 3;

/// Size of a candidate upload in bytes (always positive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ByteSize(NonZeroU64);

impl ByteSize {
    pub fn new(bytes: u64) -> Result<Self> {
        NonZeroU64::new(bytes).map(Self).ok_or(Error::InvalidSize)
    }

    /// Parse a caller-supplied decimal integer.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidSize);
        }
        let bytes = raw.parse::<u64>().map_err(|_| Error::InvalidSize)?;
        Self::new(bytes)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for ByteSize {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ByteSize> for u64 {
    fn from(value: ByteSize) -> Self {
        value.get()
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of storage epochs (always positive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct EpochCount(NonZeroU32);

impl EpochCount {
    pub fn new(epochs: u32) -> Result<Self> {
        NonZeroU32::new(epochs)
            .map(Self)
            .ok_or(Error::InvalidEpochs)
    }

    /// Parse a caller-supplied decimal integer.
    ///
    /// Fractions (`2.5`), signs, exponents and empty strings are rejected
    /// explicitly instead of being coerced.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidEpochs);
        }
        let epochs = raw.parse::<u32>().map_err(|_| Error::InvalidEpochs)?;
        Self::new(epochs)
    }

    /// Parse an optional parameter, falling back to `default` when absent.
    pub fn parse_or(raw: Option<&str>, default: EpochCount) -> Result<Self> {
        raw.map_or(Ok(default), Self::parse)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for EpochCount {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_EPOCHS).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for EpochCount {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EpochCount> for u32 {
    fn from(value: EpochCount) -> Self {
        value.get()
    }
}

impl fmt::Display for EpochCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw query parameters of a cost estimate request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CostQuery {
    #[serde(rename = "fileSize")]
    pub file_size: Option<String>,
    pub epochs: Option<String>,
}

/// Collects raw `(key, value)` query pairs.
///
/// A repeated key keeps every value joined with `,`, which can never pass
/// validation, so duplicates are rejected with that parameter's message.
impl FromIterator<(String, String)> for CostQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        fn push(slot: &mut Option<String>, value: String) {
            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value),
            }
        }

        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "fileSize" => push(&mut query.file_size, value),
                "epochs" => push(&mut query.epochs, value),
                _ => {}
            }
        }
        query
    }
}

/// A validated cost estimate request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostRequest {
    pub size: ByteSize,
    pub epochs: EpochCount,
}

impl CostRequest {
    /// Validate raw query parameters.
    ///
    /// Checks run in a fixed order: size presence, size value, then epochs.
    pub fn parse(query: &CostQuery) -> Result<Self> {
        let raw_size = query.file_size.as_deref().ok_or(Error::MissingFileSize)?;
        let size = ByteSize::parse(raw_size)?;
        let epochs = EpochCount::parse_or(query.epochs.as_deref(), EpochCount::default())?;
        Ok(Self { size, epochs })
    }
}
