//! Payment types returned by `GET /payments`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reference::CustomFields;

/// Identifier of a payment transaction, used to acknowledge it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(u64);

impl PaymentId {
    /// Creates a payment identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for PaymentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PaymentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A payment that has not been acknowledged yet.
///
/// Only the fields needed to match a payment to its reference are typed;
/// everything else the API sends is kept in [`Payment::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment identifier, used by
    /// [`ProxyPayClient::acknowledge_payment`](crate::ProxyPayClient::acknowledge_payment).
    pub id: PaymentId,
    /// Amount paid. The API sends it as a decimal string.
    pub amount: Decimal,
    /// Reference the payment was made against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<u64>,
    /// When the payment was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,
    /// Merchant entity the payment was made to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<u64>,
    /// Kind of terminal the payment was made from (e.g. `ATM`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_type: Option<String>,
    /// Custom fields copied from the reference.
    #[serde(default)]
    pub custom_fields: CustomFields,
    /// Remaining fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_id_display_and_parse() {
        let id: PaymentId = " 191113510000000000 ".parse().unwrap();
        assert_eq!(id, PaymentId::new(191_113_510_000_000_000));
        assert_eq!(id.to_string(), "191113510000000000");
        assert!("abc".parse::<PaymentId>().is_err());
    }

    #[test]
    fn test_payment_deserializes_api_payload() {
        let json = serde_json::json!({
            "id": 82_827_160_000_000_u64,
            "amount": "3000.00",
            "reference_id": 123_456_789,
            "datetime": "2016-10-13T20:14:04.000Z",
            "entity_id": 999,
            "terminal_type": "ATM",
            "terminal_location": "LUANDA",
            "transaction_id": 33_333,
            "custom_fields": { "uuid": "5f0e4b7c-0000-4000-8000-000000000000" },
        });
        let payment: Payment = serde_json::from_value(json).unwrap();
        assert_eq!(payment.id.as_u64(), 82_827_160_000_000);
        assert_eq!(payment.amount, Decimal::new(300_000, 2));
        assert_eq!(payment.reference_id, Some(123_456_789));
        assert_eq!(payment.terminal_type.as_deref(), Some("ATM"));
        assert!(payment.datetime.is_some());
        assert!(payment.custom_fields.get("uuid").is_some());
        assert_eq!(payment.extra["terminal_location"], "LUANDA");
        assert_eq!(payment.extra["transaction_id"], 33_333);
    }

    #[test]
    fn test_payment_tolerates_missing_optional_fields() {
        let payment: Payment =
            serde_json::from_value(serde_json::json!({ "id": 1, "amount": 10 })).unwrap();
        assert_eq!(payment.amount, Decimal::from(10));
        assert!(payment.reference_id.is_none());
        assert!(payment.custom_fields.is_empty());
        assert!(payment.extra.is_empty());
    }
}
