//! Form state.
//!
//! A keyed bag of loosely typed field values with `loading` and `errors`
//! slots, used by front-ends to hold what the user is editing before it is
//! sent. No validation happens here.

use crate::framework::MultipartForm;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// One field value. `Undefined` is "never set" and is dropped from request bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    #[default]
    Undefined,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text a multipart body carries for this value. `Undefined` has none.
    pub fn to_form_text(&self) -> Option<String> {
        match self {
            FieldValue::Str(s) => Some(s.clone()),
            FieldValue::Num(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Null => Some(String::new()),
            FieldValue::Undefined => None,
        }
    }

    /// `true` for missing values and whitespace-only strings.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.trim().is_empty(),
            FieldValue::Null | FieldValue::Undefined => true,
            FieldValue::Num(_) | FieldValue::Bool(_) => false,
        }
    }

    fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Str(s) => Some(Value::String(s.clone())),
            FieldValue::Num(n) => Some(Number::from_f64(*n).map_or(Value::Null, Value::Number)),
            FieldValue::Bool(b) => Some(Value::Bool(*b)),
            FieldValue::Null => Some(Value::Null),
            FieldValue::Undefined => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Num(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Num(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Num(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

static UNDEFINED: FieldValue = FieldValue::Undefined;

/// Field values plus `loading` and `errors`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    fields: Fields,
    loading: bool,
    errors: Fields,
}

impl FormState {
    pub fn new(initial: Fields) -> Self {
        Self {
            fields: initial,
            ..Self::default()
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Never fails: unknown names read as `Undefined`.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&UNDEFINED)
    }

    /// String value of a field, or `""`.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).as_str().unwrap_or("")
    }

    /// Sets one field, leaving the others alone.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Replaces every field at once.
    pub fn reset_to(&mut self, fields: Fields) {
        self.fields = fields;
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn errors(&self) -> &Fields {
        &self.errors
    }

    pub fn set_errors(&mut self, errors: Fields) {
        self.errors = errors;
    }

    /// Every defined field as a text part.
    pub fn to_multipart(&self) -> MultipartForm {
        self.fields
            .iter()
            .filter_map(|(name, value)| value.to_form_text().map(|text| (name, text)))
            .fold(MultipartForm::new(), |form, (name, text)| form.text(name.clone(), text))
    }

    /// Every defined field as a JSON object.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|(name, value)| value.to_json().map(|json| (name.clone(), json)))
            .collect();
        Value::Object(map)
    }
}
