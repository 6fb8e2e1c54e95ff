use chrono::{DateTime, NaiveDate};
use reqwest::Url;
use std::collections::HashMap;
use tera::{try_get_value, Value};

use crate::resource::FilterField;

/// Query string carrying the list filter, `""` when it is the untouched default.
/// A non-default field is carried even without a query.
pub fn filter_query<F: FilterField>(field: F, query: &str) -> String {
    if query.is_empty() && field == F::default_field() {
        return String::new();
    }
    let mut params = vec![("field", field.name())];
    if !query.is_empty() {
        params.push(("q", query));
    }
    match Url::parse_with_params("http://console.local/", &params) {
        Ok(url) => format!("?{}", url.query().unwrap_or_default()),
        Err(_) => String::new(),
    }
}

pub fn list_location<F: FilterField>(resource: &str, field: F, query: &str) -> String {
    format!("/{}{}", resource, filter_query(field, query))
}

/// Parses the calendar day out of a plain date or an RFC 3339 timestamp.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Tera filter rendering a date as `DD-MM-YYYY`; anything unparseable is shown as is.
pub fn day_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = try_get_value!("day", "value", String, value);
    Ok(Value::String(match parse_day(&raw) {
        Some(day) => day.format("%d-%m-%Y").to_string(),
        None => raw,
    }))
}
