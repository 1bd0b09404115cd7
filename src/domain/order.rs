use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of the user an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned to an order by the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed purchase record returned by the order service.
///
/// Orders are never edited or deleted client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product: String,
    pub quantity: u32,
    pub total_price: f64,
    #[serde(deserialize_with = "deserialize_order_date")]
    pub order_date: NaiveDateTime,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub product: String,
    pub quantity: u32,
    pub total_price: f64,
}

/// Body of `POST /orders/create-with-discount`. The service computes the final price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedOrderRequest {
    pub user_id: UserId,
    pub product: String,
    pub quantity: u32,
    pub price: f64,
    pub discount_percent: f64,
}

/// Order count per user, as served by `/users/order_count`.
pub type UserOrderCounts = BTreeMap<UserId, u64>;

// The service emits naive UTC timestamps; offset-qualified ones are folded to UTC.
fn deserialize_order_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_order_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_order_date(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.naive_utc());
    }
    raw.parse::<NaiveDateTime>()
        .map_err(|e| format!("invalid order_date {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_decodes_naive_timestamp() {
        let json = r#"{"id":7,"user_id":1,"product":"Widget","quantity":3,"total_price":30.0,"order_date":"2024-05-01T12:30:00.123456"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId(7));
        assert_eq!(order.user_id, UserId(1));
        assert_eq!(order.product, "Widget");
        assert_eq!(order.order_date.to_string(), "2024-05-01 12:30:00.123456");
    }

    #[test]
    fn test_order_date_with_offset_is_converted_to_utc() {
        let stamp = parse_order_date("2024-05-01T14:30:00+02:00").unwrap();
        assert_eq!(stamp.to_string(), "2024-05-01 12:30:00");
    }

    #[test]
    fn test_order_date_rejects_garbage() {
        assert!(parse_order_date("yesterday").is_err());
    }

    #[test]
    fn test_user_order_counts_decode_string_keys() {
        let counts: UserOrderCounts = serde_json::from_str(r#"{"1": 4, "2": 0}"#).unwrap();
        assert_eq!(counts.get(&UserId(1)), Some(&4));
        assert_eq!(counts.get(&UserId(2)), Some(&0));
    }
}
