//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;
use utoipa::{IntoParams, ToSchema};

/// Book record as held in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    /// Null when the caller sent `"name": null`
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub year: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Total number of pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub page_count: Option<Number>,
    /// Pages read so far, never above page_count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub read_page: Option<Number>,
    /// True when read_page equals page_count
    pub finished: bool,
    /// Whether the book is currently being read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<bool>,
    #[serde(with = "iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub inserted_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated payload
    pub fn from_payload(
        id: String,
        name: Option<String>,
        payload: BookPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            finished: is_finished(payload.read_page.as_ref(), payload.page_count.as_ref()),
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field, keeping id and inserted_at
    pub fn replaced_with(
        &self,
        name: Option<String>,
        payload: BookPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            inserted_at: self.inserted_at,
            ..Self::from_payload(String::new(), name, payload, now)
        }
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Numeric value of a JSON number; `100` and `100.0` are the same count.
fn numeric(value: &Number) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

/// Two absent counts compare equal, so a book with neither is finished.
pub fn is_finished(read_page: Option<&Number>, page_count: Option<&Number>) -> bool {
    match (read_page, page_count) {
        (Some(read), Some(total)) => numeric(read) == numeric(total),
        (None, None) => true,
        _ => false,
    }
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// `None` when the key is absent, `Some(None)` for an explicit null
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[schema(value_type = Option<f64>)]
    pub year: Option<Number>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub page_count: Option<Number>,
    #[schema(value_type = Option<f64>)]
    pub read_page: Option<Number>,
    pub reading: Option<bool>,
}

impl BookPayload {
    /// True when both counts are known and more pages were read than exist
    pub fn read_page_exceeds_page_count(&self) -> bool {
        match (&self.read_page, &self.page_count) {
            (Some(read), Some(total)) => numeric(read) > numeric(total),
            _ => false,
        }
    }
}

/// Wraps any present value, null included, so only a missing key stays `None`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

/// Book list query parameters, as received
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// Non-zero number selects books being read, zero the others
    pub reading: Option<String>,
    /// Non-zero number selects finished books, zero the others
    pub finished: Option<String>,
}

impl BookQuery {
    /// Collect the known keys from raw pairs; a repeated key keeps its first value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    pub fn into_filter(self) -> BookFilter {
        BookFilter {
            name: self.name,
            reading: self.reading.as_deref().map(parse_flag),
            finished: self.finished.as_deref().map(parse_flag),
        }
    }
}

/// A flag is true when it reads as a non-zero number, anything else is false.
///
/// Accepted numbers: decimal literals with optional sign, fraction and
/// exponent; `0x`/`0o`/`0b` integers without sign; `Infinity`. Blank is zero.
pub fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();

    let radix = match raw.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &raw[2..];
        return !digits.is_empty()
            && digits.chars().all(|c| c.is_digit(radix))
            && digits.chars().any(|c| c != '0');
    }

    let unsigned = raw.trim_start_matches(['+', '-']);
    if unsigned == "Infinity" {
        return raw.len() - unsigned.len() <= 1;
    }
    // f64 parsing also takes "inf" and "nan", which are not numbers here
    if unsigned.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return false;
    }

    raw.parse::<f64>().map(|value| value != 0.0).unwrap_or(false)
}

/// Parsed list filters; absent fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    /// Books with a null name never match a name filter
    pub fn matches_name(&self, book: &Book) -> bool {
        match &self.name {
            Some(needle) => book
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase())),
            None => true,
        }
    }

    pub fn matches_reading(&self, book: &Book) -> bool {
        match self.reading {
            Some(reading) => book.reading == Some(reading),
            None => true,
        }
    }

    pub fn matches_finished(&self, book: &Book) -> bool {
        match self.finished {
            Some(finished) => book.finished == finished,
            None => true,
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.matches_name(book) && self.matches_finished(book) && self.matches_reading(book)
    }
}

/// RFC 3339 timestamps with millisecond precision, e.g. `2024-03-01T10:15:30.123Z`
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
