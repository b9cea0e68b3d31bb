//! Frontmatter schema of the `blog` collection.
//!
//! [`validate`] turns the untyped header mapping of a post into a
//! [`BlogPostMetadata`]. The whole record is rejected on the first failing
//! field; optional fields fall back to their defaults only when absent.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::ValidationError;

const KNOWN_FIELDS: [&str; 9] = [
    "title", "date", "lastMod", "summary", "category", "tags", "image", "draft", "sticky",
];

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, PartialEq, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostMetadata {
    title: String,
    date: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_mod: Option<DateTime<FixedOffset>>,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    draft: bool,
    sticky: f64,
}

impl BlogPostMetadata {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> &DateTime<FixedOffset> {
        &self.date
    }

    pub fn last_mod(&self) -> Option<&DateTime<FixedOffset>> {
        self.last_mod.as_ref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Cover image as written in the frontmatter; never resolved or checked.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    /// Ordering weight. Its meaning belongs to whoever renders the collection.
    pub fn sticky(&self) -> f64 {
        self.sticky
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Looks a field up, treating an explicit YAML `null` the same as absence.
fn lookup<'a>(raw: &'a Mapping, field: &str) -> Option<&'a Value> {
    raw.get(field).filter(|value| !value.is_null())
}

fn required_string(raw: &Mapping, field: &'static str) -> Result<String, ValidationError> {
    match lookup(raw, field) {
        None => Err(ValidationError::MissingField { field }),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ValidationError::MissingField { field })
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationError::WrongType {
            field,
            expected: "a non-empty string",
            found: kind(other),
        }),
    }
}

fn optional_string(raw: &Mapping, field: &'static str) -> Result<Option<String>, ValidationError> {
    match lookup(raw, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
            found: kind(other),
        }),
    }
}

fn optional_date(
    raw: &Mapping,
    field: &'static str,
) -> Result<Option<DateTime<FixedOffset>>, ValidationError> {
    match lookup(raw, field) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_date(field, s).map(Some),
        Some(other) => Err(ValidationError::WrongType {
            field,
            expected: "an ISO date string",
            found: kind(other),
        }),
    }
}

/// Parses an ISO 8601 calendar date or date-time.
///
/// Date-only values and date-times without an offset are taken as UTC.
/// Reduced precision forms (`YYYY-MM`, `YYYY`) mean the first day of the
/// month or year.
pub fn parse_date(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date_time);
    }
    if let Some(date) = parse_calendar_date(trimmed) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if !value.is_ascii() {
        return None;
    }
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let completed = match value.len() {
        4 if digits(value) => format!("{value}-01-01"),
        7 if digits(&value[..4]) && value.as_bytes()[4] == b'-' && digits(&value[5..]) => {
            format!("{value}-01")
        }
        _ => value.to_string(),
    };
    NaiveDate::parse_from_str(&completed, "%Y-%m-%d").ok()
}

fn tags(raw: &Mapping) -> Result<Vec<String>, ValidationError> {
    let wrong_type = |found| ValidationError::WrongType {
        field: "tags",
        expected: "an array of strings",
        found,
    };
    match lookup(raw, "tags") {
        None => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(tag) => Ok(tag.clone()),
                other => Err(wrong_type(kind(other))),
            })
            .collect(),
        Some(other) => Err(wrong_type(kind(other))),
    }
}

fn draft(raw: &Mapping) -> Result<bool, ValidationError> {
    match lookup(raw, "draft") {
        None => Ok(false),
        Some(Value::Bool(draft)) => Ok(*draft),
        Some(other) => Err(ValidationError::WrongType {
            field: "draft",
            expected: "a boolean",
            found: kind(other),
        }),
    }
}

fn sticky(raw: &Mapping) -> Result<f64, ValidationError> {
    let wrong_type = |found| ValidationError::WrongType {
        field: "sticky",
        expected: "a number",
        found,
    };
    match lookup(raw, "sticky") {
        None => Ok(0.0),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(n) if n.is_nan() => Err(wrong_type("NaN")),
            Some(n) => Ok(n),
            None => Err(wrong_type("number")),
        },
        Some(other) => Err(wrong_type(kind(other))),
    }
}

/// Validates a frontmatter mapping against the blog post schema.
///
/// Fields are checked in schema order, so the reported error is always the
/// first offending field. Keys outside the schema are dropped.
pub fn validate(raw: &Mapping) -> Result<BlogPostMetadata, ValidationError> {
    let title = required_string(raw, "title")?;
    let date = match lookup(raw, "date") {
        None => return Err(ValidationError::MissingField { field: "date" }),
        Some(Value::String(s)) => parse_date("date", s)?,
        Some(other) => {
            return Err(ValidationError::WrongType {
                field: "date",
                expected: "an ISO date string",
                found: kind(other),
            });
        }
    };
    let last_mod = optional_date(raw, "lastMod")?;
    let summary = required_string(raw, "summary")?;
    let category = optional_string(raw, "category")?;
    let tags = tags(raw)?;
    let image = optional_string(raw, "image")?;
    let draft = draft(raw)?;
    let sticky = sticky(raw)?;

    for key in raw.keys() {
        match key.as_str() {
            Some(name) if KNOWN_FIELDS.contains(&name) => {}
            Some(name) => debug!("ignoring unknown frontmatter field: {name}"),
            None => debug!("ignoring non-string frontmatter key: {key:?}"),
        }
    }

    Ok(BlogPostMetadata {
        title,
        date,
        last_mod,
        summary,
        category,
        tags,
        image,
        draft,
        sticky,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn minimal_post_gets_defaults() {
        let meta = validate(&mapping("title: A\ndate: \"2025-05-09\"\nsummary: S\n")).unwrap();

        assert_eq!(meta.title(), "A");
        assert_eq!(meta.summary(), "S");
        assert_eq!(
            (meta.date().year(), meta.date().month(), meta.date().day()),
            (2025, 5, 9)
        );
        assert_eq!(meta.date().offset().local_minus_utc(), 0);
        assert_eq!(meta.tags(), &[] as &[String]);
        assert!(!meta.is_draft());
        assert_eq!(meta.sticky(), 0.0);
        assert_eq!(meta.last_mod(), None);
        assert_eq!(meta.category(), None);
        assert_eq!(meta.image(), None);
    }

    #[test]
    fn full_post() {
        let raw = mapping(
            r#"
title: "Astro 個人部落格開發心得"
date: "2025-05-09"
lastMod: "2025-05-10"
summary: "這篇文章分享我用 Astro 建立個人部落格的經驗與技巧。"
category: "開發筆記"
tags:
  - Astro
  - 部落格
  - 前端
image: "/images/astro-blog-cover.png"
draft: false
sticky: 1
"#,
        );
        let meta = validate(&raw).unwrap();

        assert_eq!(meta.title(), "Astro 個人部落格開發心得");
        assert_eq!(meta.last_mod().map(|d| d.day()), Some(10));
        assert_eq!(meta.category(), Some("開發筆記"));
        assert_eq!(meta.tags(), &["Astro", "部落格", "前端"]);
        assert_eq!(meta.image(), Some("/images/astro-blog-cover.png"));
        assert_eq!(meta.sticky(), 1.0);
    }

    #[test]
    fn unquoted_yaml_date_is_a_string() {
        let meta = validate(&mapping("title: A\ndate: 2025-05-09\nsummary: S\n")).unwrap();
        assert_eq!(meta.date().year(), 2025);
    }

    #[test]
    fn invalid_date() {
        let err = validate(&mapping("title: A\ndate: not-a-date\nsummary: S\n")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                field: "date",
                value: "not-a-date".to_string()
            }
        );
    }

    #[test]
    fn invalid_last_mod() {
        let err = validate(&mapping(
            "title: A\ndate: 2025-05-09\nlastMod: 2025-13-01\nsummary: S\n",
        ))
        .unwrap_err();
        assert_eq!(err.field(), "lastMod");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn missing_required_fields() {
        let cases = [
            ("date: 2025-05-09\nsummary: S\n", "title"),
            ("title: A\nsummary: S\n", "date"),
            ("title: A\ndate: 2025-05-09\n", "summary"),
            ("title: \"\"\ndate: 2025-05-09\nsummary: S\n", "title"),
            ("title: A\ndate: 2025-05-09\nsummary:\n", "summary"),
        ];
        for (yaml, field) in cases {
            assert_eq!(
                validate(&mapping(yaml)).unwrap_err(),
                ValidationError::MissingField { field },
                "{yaml}"
            );
        }
    }

    #[test]
    fn non_string_tag() {
        let err = validate(&mapping(
            "title: A\ndate: 2025-05-09\nsummary: S\ntags: [x, 5]\n",
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                field: "tags",
                expected: "an array of strings",
                found: "number"
            }
        );
    }

    #[test]
    fn wrong_types() {
        let cases = [
            ("title: 5\ndate: 2025-05-09\nsummary: S\n", "title"),
            ("title: A\ndate: 20250509\nsummary: S\n", "date"),
            ("title: A\ndate: 2025-05-09\nsummary: S\ntags: x\n", "tags"),
            ("title: A\ndate: 2025-05-09\nsummary: S\ndraft: \"no\"\n", "draft"),
            ("title: A\ndate: 2025-05-09\nsummary: S\nsticky: high\n", "sticky"),
            ("title: A\ndate: 2025-05-09\nsummary: S\nsticky: .nan\n", "sticky"),
            ("title: A\ndate: 2025-05-09\nsummary: S\ncategory: [a]\n", "category"),
            ("title: A\ndate: 2025-05-09\nsummary: S\nimage: true\n", "image"),
        ];
        for (yaml, field) in cases {
            let err = validate(&mapping(yaml)).unwrap_err();
            assert!(
                matches!(err, ValidationError::WrongType { field: f, .. } if f == field),
                "{yaml}: {err}"
            );
        }
    }

    #[test]
    fn date_formats() {
        let with_offset = parse_date("date", "2025-05-09T10:30:00+08:00").unwrap();
        assert_eq!(with_offset.offset().local_minus_utc(), 8 * 3600);
        assert_eq!(with_offset.hour(), 10);

        let naive = parse_date("date", "2025-05-09T10:30").unwrap();
        assert_eq!((naive.hour(), naive.minute()), (10, 30));

        let fractional = parse_date("date", " 2025-05-09T10:30:15.250 ").unwrap();
        assert_eq!(fractional.second(), 15);

        assert!(parse_date("date", "09/05/2025").is_err());
        assert!(parse_date("date", "2025-02-30").is_err());
    }

    #[test]
    fn reduced_precision_dates_start_the_period() {
        let month = parse_date("date", "2025-05").unwrap();
        assert_eq!((month.year(), month.month(), month.day()), (2025, 5, 1));

        let year = parse_date("date", "2025").unwrap();
        assert_eq!((year.year(), year.month(), year.day()), (2025, 1, 1));
        assert_eq!(year.hour(), 0);

        assert!(parse_date("date", "2025-13").is_err());
        assert!(parse_date("date", "202").is_err());
        assert!(parse_date("date", "2025-5").is_err());
    }

    #[test]
    fn empty_last_mod_is_absent() {
        for last_mod in ["\"\"", "\"  \""] {
            let meta = validate(&mapping(&format!(
                "title: A\ndate: \"2025-05-09\"\nlastMod: {last_mod}\nsummary: S\n"
            )))
            .unwrap();
            assert_eq!(meta.last_mod(), None);
        }
    }

    #[test]
    fn null_optional_fields_take_defaults() {
        let meta = validate(&mapping(
            "title: A\ndate: 2025-05-09\nsummary: S\ntags: ~\ndraft: ~\nsticky: ~\nlastMod: ~\n",
        ))
        .unwrap();
        assert!(meta.tags().is_empty());
        assert!(!meta.is_draft());
        assert_eq!(meta.sticky(), 0.0);
        assert_eq!(meta.last_mod(), None);
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let meta = validate(&mapping(
            "title: A\ndate: 2025-05-09\nsummary: S\nauthor: someone\n",
        ))
        .unwrap();
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("author").is_none());
    }

    #[test]
    fn validation_is_idempotent_and_pure() {
        let raw = mapping("title: A\ndate: 2025-05-09\nsummary: S\ntags: [b, a]\nsticky: 2.5\n");
        let before = raw.clone();
        let first = validate(&raw).unwrap();
        let second = validate(&raw).unwrap();
        assert_eq!(first, second);
        assert_eq!(raw, before);
        assert_eq!(first.tags(), &["b", "a"]);
    }

    #[test]
    fn serializes_with_frontmatter_names() {
        let meta = validate(&mapping(
            "title: A\ndate: 2025-05-09\nlastMod: 2025-05-10\nsummary: S\n",
        ))
        .unwrap();
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["lastMod"], "2025-05-10T00:00:00Z");
        assert_eq!(json["draft"], false);
        assert!(json.get("category").is_none());
    }
}
