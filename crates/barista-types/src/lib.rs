//! Shared types and error definitions for the barista kiosk.
//!
//! This crate holds the order-level vocabulary used by every other crate:
//! the validated customer name, the request handed to the text-generation
//! collaborator, the strictly-shaped misspelling it returns, and the
//! customer-facing response body. Announcement outcomes live in
//! [`announce`].
//!
//! Nothing in here performs I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod announce;

pub use announce::{order_ready_phrase, AnnouncementOutcome};

/// Maximum number of characters kept from a customer name.
pub const MAX_NAME_CHARS: usize = 50;

/// Exclusive upper bound of the variety seed (seeds are drawn from `0..10`).
pub const VARIETY_SEED_RANGE: u8 = 10;

/// Errors produced while constructing domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The name was empty once surrounding whitespace was removed.
    #[error("customer name is empty")]
    EmptyName,

    /// The variety seed was outside `0..VARIETY_SEED_RANGE`.
    #[error("variety seed out of range: {0}")]
    SeedOutOfRange(u8),
}

/// A customer name that has been trimmed and capped at [`MAX_NAME_CHARS`].
///
/// Truncation counts characters, not bytes, so multi-byte names are never
/// split inside a code point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerName(String);

impl CustomerName {
    /// Trims `raw`, rejects it if nothing is left, and keeps the first
    /// [`MAX_NAME_CHARS`] characters.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyName);
        }
        Ok(Self(trimmed.chars().take(MAX_NAME_CHARS).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Input to the text-generation collaborator for a single order.
///
/// The seed is a strategy hint only; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisspellRequest {
    pub name: CustomerName,
    pub variety_seed: u8,
}

impl MisspellRequest {
    pub fn new(name: CustomerName, variety_seed: u8) -> Result<Self, TypeError> {
        if variety_seed >= VARIETY_SEED_RANGE {
            return Err(TypeError::SeedOutOfRange(variety_seed));
        }
        Ok(Self { name, variety_seed })
    }
}

/// How far the misspelling strays from the original name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chaos {
    /// Subtle single-letter change.
    Low,
    /// Clearly wrong but recognizable.
    Medium,
    /// Gloriously mangled or a different word entirely.
    High,
}

impl Chaos {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Chaos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A fully validated misspelling.
///
/// Deserialization is strict: exactly these four fields must be present and
/// no others are accepted, so a value of this type is never partially filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MisspellResult {
    pub misspelled: String,
    pub pronunciation: String,
    pub chaos: Chaos,
    pub strategy: String,
}

/// Body of a successful order response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub original: String,
    pub misspelled: String,
    pub pronunciation: String,
    pub chaos: Chaos,
    pub strategy: String,
}

impl OrderResponse {
    pub fn new(name: CustomerName, result: MisspellResult) -> Self {
        Self {
            original: name.into_inner(),
            misspelled: result.misspelled,
            pronunciation: result.pronunciation,
            chaos: result.chaos,
            strategy: result.strategy,
        }
    }
}
