//! Record model for the hosted table store.
//!
//! Rows in the hosted database are free-form column bags. Rather than passing
//! `serde_json::Value` around, every cell is narrowed to [`FieldValue`], a
//! small closed set of scalar variants. Nested arrays and objects (linked
//! records, attachments) are kept as their JSON text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Opaque identifier the store assigns to each record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a store-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, single select, email, phone, date.
    Text(String),
    /// Any numeric column.
    Number(f64),
    /// Checkbox.
    Bool(bool),
    /// Explicit null.
    Null,
    /// Arrays and objects, kept as serialized JSON.
    Json(String),
}

impl FieldValue {
    /// Text view of the cell, if it has a sensible one.
    ///
    /// Whole numbers render without a fractional part so numeric code columns
    /// compare equal to their textual form.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Number(n) if n.fract() == 0.0 => Some(Cow::Owned(format!("{n:.0}"))),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Bool(_) | Self::Null | Self::Json(_) => None,
        }
    }

    /// Whether the cell counts as "set".
    ///
    /// The hosted store omits unchecked checkboxes entirely, so callers
    /// usually reach this through `Option::is_some_and`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(text) | Self::Json(text) => !text.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
            Self::Null => false,
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Json(nested.to_string()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) | Self::Json(text) => serializer.serialize_str(text),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// Column name → cell value.
pub type Fields = BTreeMap<String, FieldValue>;

/// A stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// Cell values; absent columns are simply missing.
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Look up a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }
}

/// Partial update addressed to one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordUpdate {
    /// Target record.
    pub id: RecordId,
    /// Columns to overwrite; other columns are left untouched.
    pub fields: Fields,
}

/// "OR of equality" predicate: the column equals any of the given values.
///
/// This is the only filter shape the registration flow needs, so it is the
/// only one the store contract exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    field: String,
    values: BTreeSet<String>,
}

impl Filter {
    /// Match rows whose `field` equals any of `values`.
    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Render as a spreadsheet formula, e.g. `OR({Code} = 'A',{Code} = 'B')`.
    ///
    /// Quotes and backslashes inside values are escaped. An empty filter
    /// renders as `FALSE()`.
    #[must_use]
    pub fn to_formula(&self) -> String {
        if self.values.is_empty() {
            return "FALSE()".to_string();
        }

        let clauses: Vec<String> = self
            .values
            .iter()
            .map(|value| format!("{{{}}} = '{}'", self.field, escape_formula_literal(value)))
            .collect();

        format!("OR({})", clauses.join(","))
    }

    /// Evaluate the predicate against a row in memory.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        fields
            .get(&self.field)
            .and_then(FieldValue::as_text)
            .is_some_and(|text| self.values.contains(text.as_ref()))
    }
}

fn escape_formula_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Select parameters: a predicate plus an optional column projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Row predicate.
    pub filter: Filter,
    /// Columns to return; empty means all.
    pub fields: Vec<String>,
}

impl Query {
    /// Query all columns of rows matching `filter`.
    #[must_use]
    pub const fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            fields: Vec::new(),
        }
    }

    /// Restrict the returned columns.
    #[must_use]
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}
