//! Row filters as received through the `where` argument.

use super::row::*;
use super::self_prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWhere {
    #[serde(rename = "AND", default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<RowWhere>>,
    #[serde(rename = "OR", default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<RowWhere>>,
    #[serde(rename = "NOT", default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Vec<RowWhere>>,
    pub id: Option<StringFilter>,
    pub version_id: Option<StringFilter>,
    pub created_at: Option<DateTimeFilter>,
    pub published_at: Option<DateTimeFilter>,
    pub updated_at: Option<DateTimeFilter>,
    pub readonly: Option<BoolFilter>,
    pub data: Option<JsonFilter>,
}

impl RowWhere {
    pub fn matches(&self, row: &Row) -> bool {
        let and = self.and.as_deref().unwrap_or_default();
        let or = self.or.as_deref().unwrap_or_default();
        let not = self.not.as_deref().unwrap_or_default();

        and.iter().all(|filter| filter.matches(row))
            && (or.is_empty() || or.iter().any(|filter| filter.matches(row)))
            && !not.iter().any(|filter| filter.matches(row))
            && self.id.as_ref().map_or(true, |f| f.matches(&row.id))
            && self
                .version_id
                .as_ref()
                .map_or(true, |f| f.matches(&row.version_id))
            && self
                .created_at
                .as_ref()
                .map_or(true, |f| f.matches(&row.created_at))
            && self
                .published_at
                .as_ref()
                .map_or(true, |f| f.matches(&row.published_at))
            && self
                .updated_at
                .as_ref()
                .map_or(true, |f| f.matches(&row.updated_at))
            && self.readonly.as_ref().map_or(true, |f| f.matches(row.readonly))
            && self.data.as_ref().map_or(true, |f| f.matches(&row.data))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    pub equals: Option<String>,
    #[serde(rename = "in")]
    pub in_: Option<Vec<String>>,
    pub not_in: Option<Vec<String>>,
    pub lt: Option<String>,
    pub lte: Option<String>,
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub contains: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub not: Option<String>,
}

impl StringFilter {
    pub fn matches(&self, value: &str) -> bool {
        self.equals.as_ref().map_or(true, |v| value == v)
            && self.in_.as_ref().map_or(true, |v| v.iter().any(|v| v == value))
            && self.not_in.as_ref().map_or(true, |v| v.iter().all(|v| v != value))
            && self.lt.as_ref().map_or(true, |v| value < v.as_str())
            && self.lte.as_ref().map_or(true, |v| value <= v.as_str())
            && self.gt.as_ref().map_or(true, |v| value > v.as_str())
            && self.gte.as_ref().map_or(true, |v| value >= v.as_str())
            && self.contains.as_ref().map_or(true, |v| value.contains(v.as_str()))
            && self
                .starts_with
                .as_ref()
                .map_or(true, |v| value.starts_with(v.as_str()))
            && self
                .ends_with
                .as_ref()
                .map_or(true, |v| value.ends_with(v.as_str()))
            && self.not.as_ref().map_or(true, |v| value != v)
    }
}

/// Timestamps are RFC 3339 strings and compare lexically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeFilter {
    pub equals: Option<String>,
    #[serde(rename = "in")]
    pub in_: Option<Vec<String>>,
    pub not_in: Option<Vec<String>>,
    pub lt: Option<String>,
    pub lte: Option<String>,
    pub gt: Option<String>,
    pub gte: Option<String>,
}

impl DateTimeFilter {
    pub fn matches(&self, value: &str) -> bool {
        StringFilter {
            equals: self.equals.clone(),
            in_: self.in_.clone(),
            not_in: self.not_in.clone(),
            lt: self.lt.clone(),
            lte: self.lte.clone(),
            gt: self.gt.clone(),
            gte: self.gte.clone(),
            ..Default::default()
        }
        .matches(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolFilter {
    pub equals: Option<bool>,
    pub not: Option<bool>,
}

impl BoolFilter {
    pub fn matches(&self, value: bool) -> bool {
        self.equals.map_or(true, |v| value == v) && self.not.map_or(true, |v| value != v)
    }
}

/// Filter on the row document, optionally narrowed to `path`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFilter {
    pub path: Option<Vec<String>>,
    pub equals: Option<JsonValue>,
    pub string_contains: Option<String>,
    pub string_starts_with: Option<String>,
    pub string_ends_with: Option<String>,
    pub array_contains: Option<Vec<JsonValue>>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
    pub gt: Option<f64>,
    pub gte: Option<f64>,
}

impl JsonFilter {
    fn target<'a>(&self, data: &'a JsonValue) -> Option<&'a JsonValue> {
        self.path.iter().flatten().try_fold(data, |value, segment| match value {
            JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => value.get(segment),
        })
    }

    pub fn matches(&self, data: &JsonValue) -> bool {
        let target = self.target(data);
        let text = target.and_then(JsonValue::as_str);
        let number = target.and_then(JsonValue::as_f64);

        self.equals.as_ref().map_or(true, |v| target == Some(v))
            && self
                .string_contains
                .as_ref()
                .map_or(true, |v| text.map_or(false, |t| t.contains(v.as_str())))
            && self
                .string_starts_with
                .as_ref()
                .map_or(true, |v| text.map_or(false, |t| t.starts_with(v.as_str())))
            && self
                .string_ends_with
                .as_ref()
                .map_or(true, |v| text.map_or(false, |t| t.ends_with(v.as_str())))
            && self.array_contains.as_ref().map_or(true, |v| {
                target
                    .and_then(JsonValue::as_array)
                    .map_or(false, |items| v.iter().all(|value| items.contains(value)))
            })
            && self.lt.map_or(true, |v| number.map_or(false, |n| n < v))
            && self.lte.map_or(true, |v| number.map_or(false, |n| n <= v))
            && self.gt.map_or(true, |v| number.map_or(false, |n| n > v))
            && self.gte.map_or(true, |v| number.map_or(false, |n| n >= v))
    }
}
