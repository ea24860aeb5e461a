//! Identifier newtypes shared across the backend.
//!
//! Every persisted entity is addressed by a small integer newtype so that a
//! room id can never be passed where a person id is expected. All types
//! derive Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

/// Academic period identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub i64);

/// Defense schedule batch identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub i64);

/// Defense event identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

/// Thesis case identifier (one defense per case).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub i64);

/// Examination room identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub i64);

/// Person identifier (advisor or examiner).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }
    };
}

impl_id!(PeriodId);
impl_id!(BatchId);
impl_id!(EventId);
impl_id!(CaseId);
impl_id!(RoomId);
impl_id!(PersonId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = PeriodId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(PeriodId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // PersonId and RoomId with the same value are unrelated types;
        // equality only exists within a type.
        let person = PersonId::new(7);
        let other = PersonId::new(7);
        assert_eq!(person, other);
    }
}
