//! Query-parameter mapping and typed endpoint filters.
//!
//! # Design
//! `QueryParams` is an ordered name→value list with object-assignment
//! semantics: inserting an existing name replaces its value in place. Order
//! is preserved so the emitted query string is predictable.
//!
//! Optional filters are plain serde structs. `QueryParams::from_filter`
//! flattens any `Serialize` value into the mapping, dropping absent fields and
//! rejecting anything that is not a scalar. Values are never checked for
//! meaning; the upstream service is the source of validation truth.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::ApiError;

/// Ordered query-parameter mapping for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a filter struct (or any map-shaped value) into parameters.
    ///
    /// `null` fields are skipped, strings are used as-is, numbers and bools
    /// are rendered the way a query string would show them. Nested arrays or
    /// objects fail with `ApiError::InvalidParameter`.
    pub fn from_filter<T: Serialize>(filter: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(filter).map_err(|e| ApiError::InvalidParameter {
            key: String::new(),
            reason: e.to_string(),
        })?;

        let fields = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(fields) => fields,
            other => {
                return Err(ApiError::InvalidParameter {
                    key: String::new(),
                    reason: format!("expected a set of named filters, got {}", kind(&other)),
                })
            }
        };

        let mut params = Self::new();
        for (key, value) in fields {
            match value {
                Value::Null => {}
                Value::String(s) => params.insert(key, s),
                Value::Number(n) => params.insert(key, render_number(&n)),
                Value::Bool(b) => params.insert(key, b.to_string()),
                other => {
                    return Err(ApiError::InvalidParameter {
                        reason: format!("expected a scalar value, got {}", kind(&other)),
                        key,
                    })
                }
            }
        }
        Ok(params)
    }

    /// Set `key` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Integral floats render without a fractional part, so `1.0` becomes `1`.
fn render_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f == 0.0 {
                return "0".to_string();
            }
            if f.is_finite() && f.fract() == 0.0 {
                return format!("{f:.0}");
            }
        }
    }
    n.to_string()
}

/// JSON has no NaN or infinity, so `serde_json` would turn them into
/// `null` and the field would vanish. Send them as text instead.
fn float_param<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(f) if !f.is_finite() => serializer.serialize_str(&f.to_string()),
        _ => value.serialize(serializer),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Optional filters for `GET /blocks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockFilter {
    /// Loopback-style JSON filter, passed through as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Optional filters for `GET /userBlocks/getUserBlocksForMap`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBlocksForMapFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agronomist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(serialize_with = "float_param", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(serialize_with = "float_param", skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Search radius around `lat`/`lng`, in meters.
    #[serde(
        rename = "distanceM",
        serialize_with = "float_param",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_m: Option<f64>,
}

/// Optional filters for `GET /users/{id}/getLayers`.
///
/// Epoch bounds are Unix seconds. `lat` and `lng` only take effect upstream
/// when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLayersFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Capture date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch_end: Option<i64>,
    /// Date the layer was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_epoch_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_epoch_end: Option<i64>,
    /// Date the layer was last modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modify_epoch_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modify_epoch_end: Option<i64>,
    #[serde(serialize_with = "float_param", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(serialize_with = "float_param", skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Subscribed year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_order_id: Option<String>,
}
