//! Payload and query-parameter validation
//!
//! Pure functions over the raw JSON body, so that field presence, the
//! empty-string case, and the order in which offending fields are reported
//! stay exact. Nothing in this module touches storage; a payload that fails
//! here is rejected before any persistence call.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{RestaurantFields, RestaurantPatch};

/// Non-id fields of a restaurant record, in the order validation reports
/// them. The id is never accepted from a client payload.
pub const FIELDS: [&str; 10] = [
    "name", "rating", "site", "email", "phone", "street", "city", "state", "lat", "lng",
];

const RATING_MIN: i64 = 0;
const RATING_MAX: i64 = 4;
const LAT_BOUND: f64 = 90.0;
const LNG_BOUND: f64 = 180.0;

/// Validate a full create payload.
///
/// Reports the first field that is absent or an empty string, in [`FIELDS`]
/// order, then the first numeric field outside its range (rating, lat, lng,
/// in that order). Extra keys, including `id`, are ignored; the id is
/// minted by the service.
pub fn validate_create(payload: &Value) -> Result<RestaurantFields> {
    let payload = as_object(payload)?;

    for field in FIELDS {
        if is_missing(payload.get(field)) {
            return Err(Error::MissingField(field));
        }
    }

    let rating = int_in_range(payload, "rating", RATING_MIN, RATING_MAX)?;
    let lat = float_in_range(payload, "lat", LAT_BOUND)?;
    let lng = float_in_range(payload, "lng", LNG_BOUND)?;

    Ok(RestaurantFields {
        rating,
        name: string_field(payload, "name")?,
        site: string_field(payload, "site")?,
        email: string_field(payload, "email")?,
        phone: string_field(payload, "phone")?,
        street: string_field(payload, "street")?,
        city: string_field(payload, "city")?,
        state: string_field(payload, "state")?,
        lat,
        lng,
    })
}

/// Validate a partial update payload.
///
/// Any subset of [`FIELDS`] is accepted; none are required. Supplying `id`
/// is rejected outright regardless of its value, and so is any key outside
/// the known field set. Range rules apply only to fields that are present,
/// rating, lat, lng, in that order.
pub fn validate_update(payload: &Value) -> Result<RestaurantPatch> {
    let payload = as_object(payload)?;

    if payload.contains_key("id") {
        return Err(Error::ImmutableField);
    }
    if let Some(unknown) = payload.keys().find(|k| !FIELDS.contains(&k.as_str())) {
        return Err(Error::InvalidValue(unknown.clone()));
    }

    let rating = if payload.contains_key("rating") {
        Some(int_in_range(payload, "rating", RATING_MIN, RATING_MAX)?)
    } else {
        None
    };
    let lat = if payload.contains_key("lat") {
        Some(float_in_range(payload, "lat", LAT_BOUND)?)
    } else {
        None
    };
    let lng = if payload.contains_key("lng") {
        Some(float_in_range(payload, "lng", LNG_BOUND)?)
    } else {
        None
    };

    Ok(RestaurantPatch {
        rating,
        name: optional_string(payload, "name")?,
        site: optional_string(payload, "site")?,
        email: optional_string(payload, "email")?,
        phone: optional_string(payload, "phone")?,
        street: optional_string(payload, "street")?,
        city: optional_string(payload, "city")?,
        state: optional_string(payload, "state")?,
        lat,
        lng,
    })
}

/// Validate the three raw query parameters of the statistics endpoint.
///
/// Presence is checked for all three (latitude, longitude, radius, in that
/// order) before any parsing happens; then each is parsed as a float, first
/// failure reported. Ranges are not re-checked here: the radius query is a
/// filter, not a record write.
pub fn validate_radius_query(
    latitude: Option<&str>,
    longitude: Option<&str>,
    radius: Option<&str>,
) -> Result<(f64, f64, f64)> {
    let latitude = require_param("latitude", latitude)?;
    let longitude = require_param("longitude", longitude)?;
    let radius = require_param("radius", radius)?;

    Ok((
        parse_param("latitude", latitude)?,
        parse_param("longitude", longitude)?,
        parse_param("radius", radius)?,
    ))
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| Error::InvalidValue("payload".to_string()))
}

/// Absent and empty-string values are both treated as missing.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn string_field(payload: &Map<String, Value>, field: &'static str) -> Result<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidValue(field.to_string()))
}

fn optional_string(payload: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match payload.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_owned()))
            .ok_or_else(|| Error::InvalidValue(field.to_string())),
    }
}

fn int_in_range(
    payload: &Map<String, Value>,
    field: &'static str,
    min: i64,
    max: i64,
) -> Result<i32> {
    let value = payload
        .get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::InvalidValue(field.to_string()))?;
    if value < min || value > max {
        return Err(Error::InvalidValue(field.to_string()));
    }
    Ok(value as i32)
}

fn float_in_range(payload: &Map<String, Value>, field: &'static str, bound: f64) -> Result<f64> {
    let value = payload
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::InvalidValue(field.to_string()))?;
    if value < -bound || value > bound {
        return Err(Error::InvalidValue(field.to_string()));
    }
    Ok(value)
}

fn require_param<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingParameter(name)),
    }
}

fn parse_param(name: &'static str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| Error::ParseFloat(name))
}
