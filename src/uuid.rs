//! Durable 64-bit entity identifiers.
//!
//! A [`Uuid`] is assigned to every entity at creation and survives snapshot
//! round trips, unlike the volatile [`bevy_ecs::entity::Entity`] handle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Random, non-zero 64-bit identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uuid(u64);

impl Uuid {
    /// Generate a new random identifier. Zero is never produced.
    pub fn new() -> Self {
        Self(fastrand::u64(1..))
    }

    /// Wrap an existing value, e.g. one read back from a snapshot.
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for Uuid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for Uuid {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Uuid> for u64 {
    fn from(value: Uuid) -> Self {
        value.0
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_generated_uuid_is_not_zero() {
        let id = Uuid::new();
        assert_ne!(id.as_u64(), 0);
    }

    #[test]
    fn test_generated_uuids_differ() {
        let a = Uuid::new();
        let b = Uuid::new();
        let c = Uuid::new();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_bulk_uniqueness() {
        let mut seen = FxHashSet::default();
        for _ in 0..1000 {
            assert!(seen.insert(Uuid::new()));
        }
    }

    #[test]
    fn test_from_u64_roundtrip() {
        let id = Uuid::from_u64(12837192831273);
        assert_eq!(u64::from(id), 12837192831273);
        assert_eq!(id.to_string(), "12837192831273");
    }
}
