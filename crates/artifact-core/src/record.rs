//! `Record`: one row to insert or one row returned from a query.
//!
//! A mapping from column name to SQLite value. `evidence_id` is never
//! expected here on input; the engine stamps it from the call argument.

use std::collections::btree_map;
use std::collections::BTreeMap;

use base64::Engine as _;
use rusqlite::types::Value;

/// Conversion into a stored value.
///
/// Covers the primitive types extractors produce, including borrowed
/// `&str` and `&[u8]`.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! into_integer_value {
    ($($t:ty),* $(,)?) => {
        $(impl IntoValue for $t {
            fn into_value(self) -> Value {
                Value::Integer(i64::from(self))
            }
        })*
    };
}

into_integer_value!(bool, i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Real(f64::from(self))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Real(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Blob(self)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Value {
        Value::Text(self.clone())
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

/// Column name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl IntoValue) -> Self {
        self.fields.insert(key.into(), value.into_value());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl IntoValue) -> Option<Value> {
        self.fields.insert(key.into(), value.into_value())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Text value of `key`; `None` when absent, NULL or not text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value of `key`; `None` when absent, NULL or not an integer.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Real value of `key`, widening integers.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(Value::Real(f)) => Some(*f),
            Some(Value::Integer(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(Value::Null))
    }

    /// Truthiness in the SQLite sense: non-zero numbers, non-empty text/blobs.
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.fields.get(key) {
            Some(Value::Integer(i)) => *i != 0,
            Some(Value::Real(f)) => *f != 0.0,
            Some(Value::Text(s)) => !s.is_empty(),
            Some(Value::Blob(b)) => !b.is_empty(),
            Some(Value::Null) | None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.fields
    }

    /// Render as a JSON object. Blobs become standard base64 strings and
    /// non-finite reals become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect();
        serde_json::Value::Object(map)
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Blob(b) => {
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_converts_primitives() {
        let record = Record::new()
            .with("name", "chrome")
            .with("score", 10)
            .with("ratio", 0.5)
            .with("enabled", true)
            .with("profile", None::<&str>)
            .with("icon", &b"\x89PNG"[..]);

        assert_eq!(record.get_str("name"), Some("chrome"));
        assert_eq!(record.get_i64("score"), Some(10));
        assert_eq!(record.get_f64("ratio"), Some(0.5));
        assert_eq!(record.get_i64("enabled"), Some(1));
        assert!(record.is_null("profile"));
        assert_eq!(record.get("icon"), Some(&Value::Blob(b"\x89PNG".to_vec())));
    }

    #[test]
    fn truthiness_follows_sqlite() {
        let record = Record::new()
            .with("zero", 0)
            .with("one", 1)
            .with("empty", "")
            .with("text", "yes")
            .with("null", Value::Null);

        assert!(!record.is_truthy("zero"));
        assert!(record.is_truthy("one"));
        assert!(!record.is_truthy("empty"));
        assert!(record.is_truthy("text"));
        assert!(!record.is_truthy("null"));
        assert!(!record.is_truthy("missing"));
    }

    #[test]
    fn to_json_encodes_blobs_as_base64() {
        let record = Record::new()
            .with("id", 7)
            .with("data", vec![0u8, 1, 2])
            .with("nan", f64::NAN);

        let json = record.to_json();
        assert_eq!(json["id"], 7);
        assert_eq!(json["data"], "AAEC");
        assert!(json["nan"].is_null());
    }
}
