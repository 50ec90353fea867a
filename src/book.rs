use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::LibraryError;

/// Availability of a book within the collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BookStatus {
    /// Book is on the shelf and can be checked out
    #[default]
    #[serde(rename = "available")]
    Available,
    /// Book is currently checked out
    #[serde(rename = "checked-out")]
    CheckedOut,
}

impl BookStatus {
    /// Canonical storage label for this status
    #[must_use]
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut => "checked-out",
        }
    }

    /// Parse a storage label, also accepting the labels written by older
    /// data files
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "available" | "in stock" => Some(Self::Available),
            "checked-out" | "checked out" => Some(Self::CheckedOut),
            _ => None,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for BookStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| LibraryError::InvalidStatus(s.to_string()))
    }
}

/// A single catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Store-assigned identifier, unique within the collection
    pub id: u64,
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Current availability
    pub status: BookStatus,
}

impl Book {
    /// Rebuild a record from its persisted field mapping.
    ///
    /// Older data files stored `id` and `year` as strings of digits and used
    /// different status labels; both shapes are accepted here. Writes always
    /// use the canonical numeric representation.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::MalformedRecord` when a required field is
    /// missing or a value cannot be coerced to its expected type.
    pub fn from_value(value: &Value) -> Result<Self, LibraryError> {
        let Some(fields) = value.as_object() else {
            return Err(LibraryError::MalformedRecord("record is not a JSON object".to_string()));
        };

        Ok(Self {
            id: coerce_u64("id", require(fields, "id")?)?,
            title: coerce_string("title", require(fields, "title")?)?,
            author: coerce_string("author", require(fields, "author")?)?,
            year: coerce_i32("year", require(fields, "year")?)?,
            status: coerce_status(require(fields, "status")?)?,
        })
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} by {} ({}) - {}", self.id, self.title, self.author, self.year, self.status)
    }
}

/// Look up a required field in a record mapping
fn require<'v>(fields: &'v Map<String, Value>, key: &str) -> Result<&'v Value, LibraryError> {
    fields
        .get(key)
        .ok_or_else(|| LibraryError::MalformedRecord(format!("missing required field '{key}'")))
}

/// Build the malformed-record error for an uncoercible field
fn malformed(key: &str, value: &Value) -> LibraryError {
    LibraryError::MalformedRecord(format!("field '{key}' has unexpected value {value}"))
}

/// Coerce a field to an unsigned integer, accepting string-encoded digits
fn coerce_u64(key: &str, value: &Value) -> Result<u64, LibraryError> {
    match value {
        Value::Number(number) => number.as_u64().ok_or_else(|| malformed(key, value)),
        Value::String(text) => text.trim().parse().map_err(|_| malformed(key, value)),
        _ => Err(malformed(key, value)),
    }
}

/// Coerce a field to a signed integer, accepting string-encoded digits
fn coerce_i32(key: &str, value: &Value) -> Result<i32, LibraryError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .and_then(|wide| i32::try_from(wide).ok())
            .ok_or_else(|| malformed(key, value)),
        Value::String(text) => text.trim().parse().map_err(|_| malformed(key, value)),
        _ => Err(malformed(key, value)),
    }
}

/// Coerce a field to owned text
fn coerce_string(key: &str, value: &Value) -> Result<String, LibraryError> {
    value.as_str().map(ToString::to_string).ok_or_else(|| malformed(key, value))
}

/// Coerce the status field to its enumeration
fn coerce_status(value: &Value) -> Result<BookStatus, LibraryError> {
    let Some(label) = value.as_str() else {
        return Err(malformed("status", value));
    };
    BookStatus::from_label(label)
        .ok_or_else(|| LibraryError::MalformedRecord(format!("unknown status label '{label}'")))
}
