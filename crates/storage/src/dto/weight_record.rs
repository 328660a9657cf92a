use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::{NewWeightRecord, WeightRecord};

/// Digits kept after the decimal point
pub const WEIGHT_DECIMAL_PLACES: u32 = 1;

/// Total significant digits a stored weight may have
pub const WEIGHT_MAX_DIGITS: u32 = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MSG_REQUIRED: &str = "This field is required.";
const MSG_NULL: &str = "This field may not be null.";
const MSG_INVALID_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const MSG_INVALID_NUMBER: &str = "A valid number is required.";
const MSG_MAX_DIGITS: &str = "Ensure that there are no more than 5 digits in total.";

/// Round a weight to one decimal place, ties away from zero.
///
/// The result always carries exactly one fractional digit, so `65` becomes `65.0`.
pub fn round_weight(weight: Decimal) -> Decimal {
    let mut rounded =
        weight.round_dp_with_strategy(WEIGHT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(WEIGHT_DECIMAL_PLACES);
    rounded
}

fn fits_max_digits(weight: &Decimal) -> bool {
    let limit = 10i128.pow(WEIGHT_MAX_DIGITS);
    round_weight(*weight).mantissa().abs() < limit
}

fn validate_weight_digits(weight: &Decimal) -> Result<(), ValidationError> {
    if fits_max_digits(weight) {
        Ok(())
    } else {
        Err(field_error("max_digits", MSG_MAX_DIGITS))
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Parse a JSON number or numeric string as an exact decimal.
///
/// Numbers go through their JSON text so `70.05` stays `70.05` instead of the
/// nearest binary float.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };

    if text.is_empty() {
        return None;
    }

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Numeric input whose magnitude does not fit a `Decimal` at all
fn is_oversized_number(value: &Value) -> bool {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return false,
    };

    parse_decimal(value).is_none() && text.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Parse a record id given as a JSON integer or an integer string.
pub fn parse_record_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Keeps an explicit `null` distinguishable from a missing key.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Record as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeightRecordResponse {
    pub id: i64,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 70.1)]
    pub weight: Decimal,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WeightRecord> for WeightRecordResponse {
    fn from(record: WeightRecord) -> Self {
        Self {
            id: record.id,
            date: record.date,
            weight: record.weight,
            submitted_at: record.submitted_at,
            updated_at: record.updated_at,
        }
    }
}

/// Request payload for creating a record.
///
/// Fields are loosely typed so that a wrong type on one field is reported
/// alongside the others instead of failing the whole body. Keys other than
/// `date` and `weight` (including `id`, `submitted_at`, `updated_at`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateWeightRecordRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: Option<Value>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = f64, example = 70.05)]
    pub weight: Option<Value>,
}

/// Typed create payload, checked against the column limits
#[derive(Debug, Clone, Validate)]
struct CreateWeightRecordFields {
    date: NaiveDate,
    #[validate(custom(function = "validate_weight_digits"))]
    weight: Decimal,
}

impl CreateWeightRecordRequest {
    /// Map the payload into a storable record, rounding the weight.
    pub fn into_new_record(self) -> Result<NewWeightRecord, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let date = match self.date {
            None => {
                errors.add("date", field_error("required", MSG_REQUIRED));
                None
            }
            Some(Value::Null) => {
                errors.add("date", field_error("null", MSG_NULL));
                None
            }
            Some(Value::String(text)) => {
                let parsed = NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok();
                if parsed.is_none() {
                    errors.add("date", field_error("invalid", MSG_INVALID_DATE));
                }
                parsed
            }
            Some(_) => {
                errors.add("date", field_error("invalid", MSG_INVALID_DATE));
                None
            }
        };

        let weight = match self.weight {
            None => {
                errors.add("weight", field_error("required", MSG_REQUIRED));
                None
            }
            Some(Value::Null) => {
                errors.add("weight", field_error("null", MSG_NULL));
                None
            }
            Some(value) => {
                let parsed = parse_decimal(&value);
                if parsed.is_none() {
                    if is_oversized_number(&value) {
                        errors.add("weight", field_error("max_digits", MSG_MAX_DIGITS));
                    } else {
                        errors.add("weight", field_error("invalid", MSG_INVALID_NUMBER));
                    }
                }
                parsed
            }
        };

        let (Some(date), Some(weight)) = (date, weight) else {
            return Err(errors);
        };

        let fields = CreateWeightRecordFields {
            date,
            weight: round_weight(weight),
        };
        fields.validate()?;

        Ok(NewWeightRecord {
            date: fields.date,
            weight: fields.weight,
        })
    }
}

/// Request payload for changing the weight of a record
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateWeightRecordRequest {
    #[serde(default)]
    #[schema(value_type = i64, example = 1)]
    pub update_id: Option<Value>,

    #[serde(default)]
    #[schema(value_type = f64, example = 65.0)]
    pub new_weight: Option<Value>,
}

impl UpdateWeightRecordRequest {
    pub fn record_id(&self) -> Option<i64> {
        self.update_id.as_ref().and_then(parse_record_id)
    }

    /// The new weight, rounded, or `None` if it is missing, not a number or too large.
    pub fn weight(&self) -> Option<Decimal> {
        let weight = self.new_weight.as_ref().and_then(parse_decimal)?;
        validate_weight_digits(&weight).ok()?;
        Some(round_weight(weight))
    }
}

/// Request payload for deleting a record
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DeleteWeightRecordRequest {
    #[serde(default)]
    #[schema(value_type = i64, example = 1)]
    pub del_id: Option<Value>,
}

impl DeleteWeightRecordRequest {
    pub fn record_id(&self) -> Option<i64> {
        self.del_id.as_ref().and_then(parse_record_id)
    }
}

/// Flatten validation errors into `{field: [message, ...]}`
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(errors) => Some((
                field.to_string(),
                errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect(),
            )),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use serde_json::json;

    fn create_request(body: Value) -> CreateWeightRecordRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_round_weight() {
        assert_eq!(round_weight(dec!(62.34)), dec!(62.3));
        assert_eq!(round_weight(dec!(70.05)), dec!(70.1));
        assert_eq!(round_weight(dec!(70.04)), dec!(70.0));
        assert_eq!(round_weight(dec!(-0.05)), dec!(-0.1));
        assert_eq!(round_weight(dec!(65)).to_string(), "65.0");
    }

    #[test]
    fn test_parse_decimal_keeps_json_text() {
        assert_eq!(parse_decimal(&json!(70.05)), Some(dec!(70.05)));
        assert_eq!(parse_decimal(&json!("65.0")), Some(dec!(65.0)));
        assert_eq!(parse_decimal(&json!(" 64 ")), Some(dec!(64)));
        assert_eq!(parse_decimal(&json!(1e3)), Some(dec!(1000)));
        assert_eq!(parse_decimal(&json!("abc")), None);
        assert_eq!(parse_decimal(&json!("")), None);
        assert_eq!(parse_decimal(&json!(true)), None);
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id(&json!(7)), Some(7));
        assert_eq!(parse_record_id(&json!("7")), Some(7));
        assert_eq!(parse_record_id(&json!(7.5)), None);
        assert_eq!(parse_record_id(&json!("seven")), None);
        assert_eq!(parse_record_id(&json!(null)), None);
    }

    #[test]
    fn test_create_rounds_weight() {
        let record = create_request(json!({"date": "2024-01-01", "weight": 70.05}))
            .into_new_record()
            .unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(record.weight, dec!(70.1));
    }

    #[test]
    fn test_create_ignores_read_only_fields() {
        let record = create_request(json!({
            "id": 42,
            "date": "2024-03-05",
            "weight": "64",
            "submitted_at": "1999-01-01T00:00:00Z",
            "updated_at": "1999-01-01T00:00:00Z",
            "_t": 1700000000000u64
        }))
        .into_new_record()
        .unwrap();

        assert_eq!(record.weight, dec!(64.0));
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let errors = create_request(json!({})).into_new_record().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields["date"], vec![MSG_REQUIRED.to_string()]);
        assert_eq!(fields["weight"], vec![MSG_REQUIRED.to_string()]);
    }

    #[test]
    fn test_create_rejects_wrong_types() {
        let errors = create_request(json!({"date": 20240101, "weight": "heavy"}))
            .into_new_record()
            .unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields["date"], vec![MSG_INVALID_DATE.to_string()]);
        assert_eq!(fields["weight"], vec![MSG_INVALID_NUMBER.to_string()]);
    }

    #[test]
    fn test_create_rejects_null() {
        let errors = create_request(json!({"date": null, "weight": 60}))
            .into_new_record()
            .unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields["date"], vec![MSG_NULL.to_string()]);
        assert!(!fields.contains_key("weight"));
    }

    #[test]
    fn test_create_rejects_too_many_digits() {
        let errors = create_request(json!({"date": "2024-01-01", "weight": 10000}))
            .into_new_record()
            .unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields["weight"], vec![MSG_MAX_DIGITS.to_string()]);

        let record = create_request(json!({"date": "2024-01-01", "weight": 9999.94}))
            .into_new_record()
            .unwrap();
        assert_eq!(record.weight, dec!(9999.9));

        // rounds up past the limit
        assert!(
            create_request(json!({"date": "2024-01-01", "weight": 9999.95}))
                .into_new_record()
                .is_err()
        );
    }

    #[test]
    fn test_create_reports_oversized_numbers_as_too_many_digits() {
        for weight in [json!(1e30), json!("123456789012345678901234567890")] {
            let errors = create_request(json!({"date": "2024-01-01", "weight": weight}))
                .into_new_record()
                .unwrap_err();
            let fields = field_errors(&errors);

            assert_eq!(fields["weight"], vec![MSG_MAX_DIGITS.to_string()]);
        }

        assert!(!is_oversized_number(&json!("1e30e")));
        assert!(!is_oversized_number(&json!("inf")));
    }

    #[test]
    fn test_update_request() {
        let request: UpdateWeightRecordRequest =
            serde_json::from_value(json!({"update_id": "3", "new_weight": "65.25"})).unwrap();
        assert_eq!(request.record_id(), Some(3));
        assert_eq!(request.weight(), Some(dec!(65.3)));

        let request: UpdateWeightRecordRequest =
            serde_json::from_value(json!({"update_id": 3, "new_weight": "abc"})).unwrap();
        assert_eq!(request.weight(), None);

        let request: UpdateWeightRecordRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.record_id(), None);
        assert_eq!(request.weight(), None);
    }

    #[test]
    fn test_response_serializes_weight_as_number() {
        let record = WeightRecord {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            weight: dec!(70.1),
            submitted_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(WeightRecordResponse::from(record)).unwrap();
        assert_eq!(value["weight"], json!(70.1));
        assert_eq!(value["date"], json!("2024-01-01"));
        assert_eq!(value["id"], json!(1));
    }
}
