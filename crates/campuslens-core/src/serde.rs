//! Lenient deserializers for request payloads and query strings.
//!
//! Browser forms send dates as `DD/MM/YYYY`, booleans as `"true"`/`"1"`,
//! and multi-selects as comma separated strings. These helpers normalise
//! all of that before it reaches a service.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parses `DD/MM/YYYY`, `YYYY-MM-DD` or an RFC 3339 timestamp into a date.
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.contains('/') {
        return NaiveDate::parse_from_str(input, "%d/%m/%Y").ok();
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| input.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

pub fn deserialize_flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_flexible_date(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}', expected DD/MM/YYYY or YYYY-MM-DD")))
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_flexible_date(&s).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date '{s}', expected DD/MM/YYYY or YYYY-MM-DD"))
        }),
        None => Ok(None),
    }
}

/// Parses an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM[:SS]` (taken as
/// UTC) or any date accepted by [`parse_flexible_date`] (midnight UTC).
pub fn parse_flexible_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    if input.len() > 10 && !input.contains('/') {
        return None;
    }
    parse_flexible_date(input).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|n| n.and_utc())
}

pub fn deserialize_flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_flexible_datetime(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date/time '{s}'")))
}

/// Treats an empty or whitespace-only string as `None`.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<i32>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`.
pub fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(false),
        Some(s) => parse_flag(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid boolean '{s}'"))),
        None => Ok(false),
    }
}

/// Splits a comma separated list, dropping blanks.
pub fn split_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn deserialize_comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.as_deref().map(split_comma_list).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        flag: bool,
        #[serde(default, deserialize_with = "deserialize_comma_list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        branch: Option<String>,
    }

    #[test]
    fn parses_day_month_year() {
        assert_eq!(
            parse_flexible_date("05/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn parses_iso_dates_and_timestamps() {
        assert_eq!(
            parse_flexible_date("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_flexible_date("2024-03-05T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_flexible_date("31/02/2024"), None);
        assert_eq!(parse_flexible_date("yesterday"), None);
        assert_eq!(parse_flexible_date("   "), None);
    }

    #[test]
    fn parses_datetimes_in_several_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            .and_utc();
        assert_eq!(parse_flexible_datetime("2024-03-05T09:30:00Z"), Some(expected));
        assert_eq!(parse_flexible_datetime("2024-03-05T09:30"), Some(expected));
        assert_eq!(parse_flexible_datetime("2024-03-05 09:30:00"), Some(expected));
        assert_eq!(
            parse_flexible_datetime("05/03/2024").map(|d| d.date_naive()),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_flexible_datetime("2024-03-05T25:99"), None);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn comma_lists_drop_blanks() {
        assert_eq!(
            split_comma_list(" 21A91A0501, ,21A91A0502,"),
            vec!["21A91A0501".to_string(), "21A91A0502".to_string()]
        );
    }

    #[test]
    fn form_fields_deserialize_leniently() {
        let form: Form = serde_json::from_str(
            r#"{"date":"01/12/2023","flag":"true","items":"a,b","branch":"  "}"#,
        )
        .unwrap();
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2023, 12, 1));
        assert!(form.flag);
        assert_eq!(form.items, vec!["a", "b"]);
        assert_eq!(form.branch, None);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.date, None);
        assert!(!form.flag);
        assert!(form.items.is_empty());
    }

    #[test]
    fn invalid_date_is_an_error() {
        let result: Result<Form, _> = serde_json::from_str(r#"{"date":"13/13/2023"}"#);
        assert!(result.is_err());
    }
}
