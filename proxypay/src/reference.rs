//! Payment reference types.
//!
//! A payment reference is what a customer pays against: a 9-digit numeric
//! identifier, an amount, the last day it can be paid, and up to ten
//! free-form custom fields. The wire body of `PUT /references/{id}` is
//! [`ReferenceBody`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Days, Local, NaiveDate};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::DEFAULT_EXPIRE_DAYS;
use crate::error::ProxyPayError;

/// A payment reference identifier.
///
/// Holds at most 9 decimal digits and always renders zero-padded to exactly
/// 9 characters, which is how it appears in request paths.
///
/// ```rust
/// use proxypay::ReferenceId;
///
/// let id = ReferenceId::new(42)?;
/// assert_eq!(id.to_string(), "000000042");
/// # Ok::<(), proxypay::ProxyPayError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ReferenceId(u64);

impl ReferenceId {
    /// Number of digits in a rendered reference identifier.
    pub const DIGITS: usize = 9;

    /// Largest identifier that fits in [`ReferenceId::DIGITS`] digits.
    pub const MAX: u64 = 999_999_999;

    /// Creates a reference identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::InvalidArgument`] if `id` has more than
    /// 9 digits.
    pub fn new(id: u64) -> Result<Self, ProxyPayError> {
        if id > Self::MAX {
            return Err(ProxyPayError::InvalidArgument(format!(
                "reference id {id} has more than {} digits",
                Self::DIGITS
            )));
        }
        Ok(Self(id))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for ReferenceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$}", self.0, width = Self::DIGITS)
    }
}

/// Parses the raw body returned by `POST /reference_ids`.
///
/// Surrounding whitespace is ignored; anything that is not a non-negative
/// integer of at most 9 digits is rejected.
impl FromStr for ReferenceId {
    type Err = ProxyPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id = trimmed.parse::<u64>().map_err(|_| {
            ProxyPayError::InvalidArgument(format!(
                "Error generating reference ID: {trimmed:?} is not an integer"
            ))
        })?;
        Self::new(id)
    }
}

impl TryFrom<u64> for ReferenceId {
    type Error = ProxyPayError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReferenceId> for u64 {
    fn from(value: ReferenceId) -> Self {
        value.0
    }
}

/// The last calendar day a reference can be paid, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpireDate(NaiveDate);

impl ExpireDate {
    /// Returns the date `days` days after `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::InvalidArgument`] if the result is outside the
    /// supported calendar range.
    pub fn days_after(date: NaiveDate, days: u32) -> Result<Self, ProxyPayError> {
        date.checked_add_days(Days::new(u64::from(days)))
            .map(Self)
            .ok_or_else(|| {
                ProxyPayError::InvalidArgument(format!("{date} + {days} days is out of range"))
            })
    }

    /// Returns the date `days` days after today, in the local time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::InvalidArgument`] if the result is outside the
    /// supported calendar range.
    pub fn days_from_today(days: u32) -> Result<Self, ProxyPayError> {
        Self::days_after(Local::now().date_naive(), days)
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Display for ExpireDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Caller-supplied metadata attached to a payment reference.
///
/// Keeps insertion order. Before a reference is sent, a fresh UUID is stored
/// under [`CustomFields::UUID_KEY`] and the map is capped at
/// [`CustomFields::MAX_ENTRIES`] entries by evicting the most recently
/// inserted ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFields(IndexMap<String, Value>);

impl CustomFields {
    /// Maximum number of entries accepted by the API, `uuid` included.
    pub const MAX_ENTRIES: usize = 10;

    /// Key under which the generated UUID is stored.
    pub const UUID_KEY: &'static str = "uuid";

    /// Creates an empty set of custom fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`CustomFields::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Stamps `uuid` into the fields, evicting the most recently inserted
    /// entries until the result holds at most [`CustomFields::MAX_ENTRIES`].
    #[must_use]
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.0.shift_remove(Self::UUID_KEY);
        while self.0.len() >= Self::MAX_ENTRIES {
            self.0.pop();
        }
        self.0
            .insert(Self::UUID_KEY.to_owned(), Value::String(uuid.to_string()));
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CustomFields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parameters of [`ProxyPayClient::create_payment`](crate::ProxyPayClient::create_payment).
///
/// ```rust
/// use proxypay::{CreatePayment, CustomFields};
/// use rust_decimal::Decimal;
///
/// let request = CreatePayment::new(Decimal::new(150_000, 2))
///     .with_expire_days(3)
///     .with_custom_fields(CustomFields::new().with("order", "A-17"));
/// assert_eq!(request.expire_days, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePayment {
    /// Amount to charge. Not validated; must be positive for the API to
    /// accept it.
    pub amount: Decimal,
    /// Days from today until the reference expires.
    pub expire_days: u32,
    /// Pre-obtained reference identifier. When `None`, one is generated.
    pub reference_id: Option<ReferenceId>,
    /// Metadata attached to the reference.
    pub custom_fields: CustomFields,
}

impl CreatePayment {
    /// Creates a request for `amount` with default expiry and no fields.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            expire_days: DEFAULT_EXPIRE_DAYS,
            reference_id: None,
            custom_fields: CustomFields::new(),
        }
    }

    /// Sets the number of days until the reference expires.
    #[must_use]
    pub const fn with_expire_days(mut self, days: u32) -> Self {
        self.expire_days = days;
        self
    }

    /// Uses a pre-obtained reference identifier.
    #[must_use]
    pub const fn with_reference_id(mut self, reference_id: ReferenceId) -> Self {
        self.reference_id = Some(reference_id);
        self
    }

    /// Sets the custom fields.
    #[must_use]
    pub fn with_custom_fields(mut self, custom_fields: CustomFields) -> Self {
        self.custom_fields = custom_fields;
        self
    }
}

/// Wire body of `PUT /references/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceBody {
    /// Amount to charge.
    pub amount: Decimal,
    /// Last day the reference can be paid.
    pub end_datetime: ExpireDate,
    /// Metadata, including the generated `uuid`.
    pub custom_fields: CustomFields,
}

impl ReferenceBody {
    /// Builds the body for `request`, expiring `request.expire_days` after
    /// `today` and stamped with `uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyPayError::InvalidArgument`] if the expiry date is out of
    /// range.
    pub fn build(
        request: CreatePayment,
        today: NaiveDate,
        uuid: Uuid,
    ) -> Result<Self, ProxyPayError> {
        Ok(Self {
            amount: request.amount,
            end_datetime: ExpireDate::days_after(today, request.expire_days)?,
            custom_fields: request.custom_fields.with_uuid(uuid),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_fields() -> CustomFields {
        (0..10).map(|i| (format!("k{i}"), i)).collect()
    }

    #[test]
    fn test_reference_id_is_zero_padded() {
        assert_eq!(ReferenceId::new(42).unwrap().to_string(), "000000042");
        assert_eq!(ReferenceId::new(0).unwrap().to_string(), "000000000");
        assert_eq!(
            ReferenceId::new(999_999_999).unwrap().to_string(),
            "999999999"
        );
    }

    #[test]
    fn test_reference_id_rejects_more_than_nine_digits() {
        let err = ReferenceId::new(1_000_000_000).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_reference_id_parses_server_body() {
        let id: ReferenceId = "123456\n".parse().unwrap();
        assert_eq!(id.as_u64(), 123_456);
        assert_eq!(id.to_string(), "000123456");
    }

    #[test]
    fn test_reference_id_rejects_non_integers() {
        for body in ["", "abc", "12.5", "-5", "{\"error\":\"nope\"}", "Error: 7: timeout"] {
            let err = body.parse::<ReferenceId>().unwrap_err();
            assert!(err.is_invalid_argument(), "body {body:?}");
        }
    }

    #[test]
    fn test_expire_date_adds_days() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let date = ExpireDate::days_after(today, 5).unwrap();
        assert_eq!(date.to_string(), "2024-01-06");
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-01-06\"");
    }

    #[test]
    fn test_expire_date_crosses_month_and_leap_day() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        assert_eq!(
            ExpireDate::days_after(today, 3).unwrap().to_string(),
            "2024-03-01"
        );
        assert_eq!(
            ExpireDate::days_after(today, 0).unwrap().to_string(),
            "2024-02-27"
        );
    }

    #[test]
    fn test_with_uuid_adds_uuid_field() {
        let uuid = Uuid::new_v4();
        let fields = CustomFields::new().with("order", "A-1").with_uuid(uuid);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("uuid").unwrap(), &Value::String(uuid.to_string()));
    }

    #[test]
    fn test_with_uuid_caps_ten_fields_by_evicting_last() {
        let fields = ten_fields().with_uuid(Uuid::new_v4());
        assert_eq!(fields.len(), CustomFields::MAX_ENTRIES);
        assert!(fields.get("k9").is_none());
        assert!(fields.get("k0").is_some());
        assert!(fields.get("k8").is_some());
        assert!(fields.get("uuid").is_some());
    }

    #[test]
    fn test_with_uuid_caps_oversized_fields() {
        let fields: CustomFields = (0..14).map(|i| (format!("k{i}"), i)).collect();
        let fields = fields.with_uuid(Uuid::new_v4());
        assert_eq!(fields.len(), CustomFields::MAX_ENTRIES);
    }

    #[test]
    fn test_with_uuid_replaces_caller_uuid() {
        let uuid = Uuid::new_v4();
        let fields = ten_fields().with("uuid", "caller").with_uuid(uuid);
        assert_eq!(fields.len(), CustomFields::MAX_ENTRIES);
        assert_eq!(fields.get("uuid").unwrap(), &Value::String(uuid.to_string()));
    }

    #[test]
    fn test_reference_body_wire_format() {
        let uuid = Uuid::new_v4();
        let request = CreatePayment::new(Decimal::new(300_000, 2))
            .with_custom_fields(CustomFields::new().with("order", "A-1"));
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let body = ReferenceBody::build(request, today, uuid).unwrap();

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "amount": "3000.00",
                "end_datetime": "2024-01-06",
                "custom_fields": { "order": "A-1", "uuid": uuid.to_string() },
            })
        );
    }
}
