//! Typed sequential identifiers.
//!
//! Identifiers are monotonic per-entity-kind counters rendered as prefixed
//! strings (`PRD-1001`, `ORD-1001`, ...). The counter lives in the owning
//! store; the id type only carries the sequence number, so ordering by id is
//! ordering by creation.

use core::str::FromStr;

use crate::error::DomainError;

/// Common interface of the prefixed sequential id types.
pub trait EntityId:
    Copy
    + Eq
    + Ord
    + core::hash::Hash
    + core::fmt::Debug
    + core::fmt::Display
    + Send
    + Sync
    + 'static
{
    /// Rendering prefix, e.g. `"PRD"`.
    const PREFIX: &'static str;

    fn from_seq(seq: u64) -> Self;

    fn seq(&self) -> u64;
}

macro_rules! impl_entity_id {
    ($t:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $t(u64);

        impl crate::id::EntityId for $t {
            const PREFIX: &'static str = $prefix;

            fn from_seq(seq: u64) -> Self {
                Self(seq)
            }

            fn seq(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let seq = s
                    .strip_prefix(concat!($prefix, "-"))
                    .and_then(|rest| rest.parse::<u64>().ok())
                    .ok_or_else(|| {
                        DomainError::invalid_argument(format!(
                            "malformed {} id: {s}",
                            $prefix
                        ))
                    })?;
                Ok(Self(seq))
            }
        }

        impl serde::Serialize for $t {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_entity_id!(ProductId, "PRD", "Identifier of a catalog product.");
impl_entity_id!(CustomerId, "CUS", "Identifier of a customer.");
impl_entity_id!(SupplierId, "SUP", "Identifier of a supplier.");
impl_entity_id!(OrderId, "ORD", "Identifier of an order.");
impl_entity_id!(MovementId, "MOV", "Identifier of a stock movement.");
impl_entity_id!(InvoiceId, "INV", "Identifier of an invoice.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_render_with_prefix_and_sequence() {
        assert_eq!(ProductId::from_seq(1001).to_string(), "PRD-1001");
        assert_eq!(InvoiceId::from_seq(7).to_string(), "INV-7");
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        let id: OrderId = "ORD-1042".parse().unwrap();
        assert_eq!(id, OrderId::from_seq(1042));
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        assert!("PRD-1001".parse::<OrderId>().is_err());
        assert!("ORD-".parse::<OrderId>().is_err());
        assert!("garbage".parse::<OrderId>().is_err());
    }

    #[test]
    fn ids_order_by_creation_sequence() {
        assert!(MovementId::from_seq(1002) > MovementId::from_seq(1001));
    }

    #[test]
    fn ids_serialize_as_strings() {
        let json = serde_json::to_string(&CustomerId::from_seq(1001)).unwrap();
        assert_eq!(json, "\"CUS-1001\"");
        let back: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CustomerId::from_seq(1001));
    }
}
