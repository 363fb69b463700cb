use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const TOTAL_KEY: &str = "site-total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Hit,
    Get,
}

impl Endpoint {
    pub fn for_increment(increment: bool) -> Self {
        if increment { Endpoint::Hit } else { Endpoint::Get }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Hit => "hit",
            Endpoint::Get => "get",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterKey(String);

impl CounterKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn total() -> Self {
        Self::new(TOTAL_KEY)
    }

    pub fn daily(date: NaiveDate) -> Self {
        Self(format!("daily-{}", date.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body returned by the counter service, kept as raw JSON. Some
/// deployments answer with `value`, others with `count`; any other shape
/// (arrays, scalars, objects without either field) reads as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CounterResponse(Value);

impl CounterResponse {
    pub fn new(body: Value) -> Self {
        Self(body)
    }

    pub fn extract(&self) -> u64 {
        ["value", "count"]
            .iter()
            .find_map(|field| self.0.get(*field).filter(|v| !v.is_null()))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub struct CounterQuery {
    #[serde(default)]
    pub increment: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub namespace: String,
    pub key: String,
    pub value: u64,
    pub display: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CounterResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn value_field_wins() {
        assert_eq!(parse(r#"{"value": 1234, "count": 9}"#).extract(), 1234);
    }

    #[test]
    fn falls_back_to_count() {
        assert_eq!(parse(r#"{"count": 7}"#).extract(), 7);
        assert_eq!(parse(r#"{"value": null, "count": 7}"#).extract(), 7);
    }

    #[test]
    fn defaults_to_zero() {
        assert_eq!(parse(r#"{}"#).extract(), 0);
        assert_eq!(parse(r#"{"other": 5}"#).extract(), 0);
        assert_eq!(parse(r#"{"value": "many"}"#).extract(), 0);
    }

    #[test]
    fn arrays_have_no_fields() {
        assert_eq!(parse("[1234, 9]").extract(), 0);
        assert_eq!(parse(r#"[{"value": 5}]"#).extract(), 0);
    }

    #[test]
    fn scalars_read_as_zero() {
        assert_eq!(parse("5").extract(), 0);
        assert_eq!(parse("true").extract(), 0);
        assert_eq!(parse(r#""x""#).extract(), 0);
        assert_eq!(parse("null").extract(), 0);
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        assert_eq!(parse(r#"{"value": 3, "value": 4}"#).extract(), 4);
    }

    #[test]
    fn daily_key_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(CounterKey::daily(date).as_str(), "daily-2026-03-07");
        assert_eq!(CounterKey::total().as_str(), "site-total");
    }

    #[test]
    fn endpoint_follows_increment_flag() {
        assert_eq!(Endpoint::for_increment(true).as_str(), "hit");
        assert_eq!(Endpoint::for_increment(false).as_str(), "get");
    }
}
