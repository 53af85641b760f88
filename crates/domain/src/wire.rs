//! Serde helpers for the backend's loosely typed JSON.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Treats `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a signed count, clamping negatives to 0 and `null` to 0.
pub(crate) fn clamped_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

/// Maps `null` and whitespace-only strings to `None`.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Accepts RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS[.f]` ones
/// (read as UTC). Anything else becomes `None`.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(parse_datetime))
}

pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime("2024-03-01T10:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse_datetime("2024-03-01T10:30:00.123456").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 3, 1, 10));

        assert!(parse_datetime("2024-03-01 10:30:00").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[derive(Deserialize)]
    struct Stock {
        #[serde(default, deserialize_with = "clamped_count")]
        units: u32,
    }

    fn stock(json: &str) -> u32 {
        serde_json::from_str::<Stock>(json).unwrap().units
    }

    #[test]
    fn test_clamped_count() {
        assert_eq!(stock(r#"{"units": 7}"#), 7);
        assert_eq!(stock(r#"{"units": -4}"#), 0);
        assert_eq!(stock(r#"{"units": null}"#), 0);
        assert_eq!(stock(r#"{}"#), 0);
        assert_eq!(stock(r#"{"units": 99999999999}"#), u32::MAX);
    }
}
