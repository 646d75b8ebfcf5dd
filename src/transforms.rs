//! Reusable field transforms.
//!
//! Every transform here accepts [`Resolved::Missing`] and a present JSON null
//! and maps both to the documented default (`None` or an empty list). Values of
//! an unexpected shape are reported as [`TransformError`]s.

use crate::error::TransformError;
use crate::mapper::Mapped;
use crate::path::Resolved;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

type TransformResult<T> = std::result::Result<T, TransformError>;

fn shape_error(expected: &str, found: &Value) -> TransformError {
    TransformError::new(format!("expected {}, found {}", expected, found))
}

/// Coerce a number or numeric string to an integer.
pub fn int(resolved: Resolved<'_>) -> TransformResult<Option<i64>> {
    match resolved.present() {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| TransformError::new(format!("{} is not an integer", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| TransformError::new(format!("invalid integer {:?}: {}", s, e))),
        Some(other) => Err(shape_error("an integer", other)),
    }
}

/// A string with surrounding whitespace and newlines removed.
pub fn trimmed(resolved: Resolved<'_>) -> TransformResult<Option<String>> {
    match resolved.present() {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(shape_error("a string", other)),
    }
}

/// Text of a scalar value. Numbers keep their JSON spelling, so an
/// identifier published as `12345` reads back as `"12345"`.
pub fn scalar_text(resolved: Resolved<'_>) -> TransformResult<Option<String>> {
    match resolved.present() {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(shape_error("a string or number", other)),
    }
}

/// Collapse a list of single-key records (`[{"value": "a"}, ...]`) into the
/// list of their `key` members.
pub fn flatten(
    key: &'static str,
) -> impl Fn(Resolved<'_>) -> TransformResult<Vec<String>> + Send + Sync + 'static {
    move |resolved: Resolved<'_>| {
        let items = match resolved.present() {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(shape_error("a list", other)),
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.get(key)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        TransformError::new(format!("record {} has no string `{}`", i, key))
                    })
            })
            .collect()
    }
}

/// A date whose month and day may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

fn date_part(resolved: Resolved<'_>, part: &str, max: i64) -> TransformResult<Option<i64>> {
    let value = int(resolved.get(part).get("value"))
        .map_err(|e| TransformError::new(format!("{}: {}", part, e)))?;
    match value {
        Some(n) if !(1..=max).contains(&n) => Err(TransformError::new(format!(
            "{} {} out of range 1..={}",
            part, n, max
        ))),
        other => Ok(other),
    }
}

/// Parse `{"year": {"value": "2014"}, "month": {"value": "05"}, ...}` into a
/// [`PartialDate`]. A present record without a year is an error.
pub fn date_parts(resolved: Resolved<'_>) -> TransformResult<Option<PartialDate>> {
    if resolved.present().is_none() {
        return Ok(None);
    }
    let year = date_part(resolved, "year", 9999)?
        .ok_or_else(|| TransformError::new("date has no year"))?;
    let month = date_part(resolved, "month", 12)?;
    let day = date_part(resolved, "day", 31)?;
    Ok(Some(PartialDate {
        year: year as i32,
        month: month.map(|m| m as u8),
        day: day.map(|d| d as u8),
    }))
}

/// Wrap a nested record as a child view.
pub fn view<T: Mapped>(resolved: Resolved<'_>) -> TransformResult<Option<T>> {
    match resolved.present() {
        None => Ok(None),
        Some(document) => T::from_document(document.clone())
            .map(Some)
            .map_err(TransformError::from),
    }
}

/// Wrap every record of a list as a child view; Missing is an empty list.
pub fn views<T: Mapped>(resolved: Resolved<'_>) -> TransformResult<Vec<T>> {
    Ok(optional_views(resolved)?.unwrap_or_default())
}

/// Like [`views`], but keeps Missing distinguishable as `None`.
pub fn optional_views<T: Mapped>(resolved: Resolved<'_>) -> TransformResult<Option<Vec<T>>> {
    match resolved.present() {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| T::from_document(item.clone()).map_err(TransformError::from))
            .collect::<TransformResult<Vec<T>>>()
            .map(Some),
        Some(other) => Err(shape_error("a list", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{resolve, Path};
    use serde_json::json;

    fn at<'a>(doc: &'a Value, key: &str) -> Resolved<'a> {
        resolve(doc, &Path::from([key]))
    }

    #[test]
    fn test_int_coercion() {
        let doc = json!({"s": "42", "n": 7, "pad": " 3 ", "null": null, "bad": "forty", "f": 1.5, "b": true});
        assert_eq!(int(at(&doc, "s")), Ok(Some(42)));
        assert_eq!(int(at(&doc, "n")), Ok(Some(7)));
        assert_eq!(int(at(&doc, "pad")), Ok(Some(3)));
        assert_eq!(int(at(&doc, "null")), Ok(None));
        assert_eq!(int(at(&doc, "absent")), Ok(None));
        assert!(int(at(&doc, "bad")).is_err());
        assert!(int(at(&doc, "f")).is_err());
        assert!(int(at(&doc, "b")).is_err());
    }

    #[test]
    fn test_trimmed() {
        let doc = json!({"bio": "  Physicist.\n\n", "n": 1});
        assert_eq!(trimmed(at(&doc, "bio")), Ok(Some("Physicist.".to_string())));
        assert_eq!(trimmed(at(&doc, "absent")), Ok(None));
        assert!(trimmed(at(&doc, "n")).is_err());
    }

    #[test]
    fn test_scalar_text_keeps_numeric_identifiers() {
        let doc = json!({"s": "10.1000/x", "n": 12345, "null": null, "list": [1]});
        assert_eq!(scalar_text(at(&doc, "s")).unwrap().as_deref(), Some("10.1000/x"));
        assert_eq!(scalar_text(at(&doc, "n")).unwrap().as_deref(), Some("12345"));
        assert_eq!(scalar_text(at(&doc, "null")).unwrap(), None);
        assert_eq!(scalar_text(at(&doc, "absent")).unwrap(), None);
        assert!(scalar_text(at(&doc, "list")).is_err());
    }

    #[test]
    fn test_flatten_single_key_records() {
        let doc = json!({
            "names": [{"value": "A. Lovelace"}, {"value": "Ada Byron"}],
            "broken": [{"value": "ok"}, {"other": "x"}],
            "scalar": "x"
        });
        let values = flatten("value");
        assert_eq!(
            values(at(&doc, "names")).unwrap(),
            vec!["A. Lovelace", "Ada Byron"]
        );
        assert!(values(at(&doc, "absent")).unwrap().is_empty());
        assert!(values(at(&doc, "broken")).unwrap_err().message().contains("record 1"));
        assert!(values(at(&doc, "scalar")).is_err());
    }

    #[test]
    fn test_date_parts() {
        let doc = json!({
            "full": {"year": {"value": "2014"}, "month": {"value": "05"}, "day": {"value": "09"}},
            "year_only": {"year": {"value": "1999"}, "month": null},
            "no_year": {"month": {"value": "01"}},
            "bad_month": {"year": {"value": "2001"}, "month": {"value": "13"}}
        });

        let full = date_parts(at(&doc, "full")).unwrap().unwrap();
        assert_eq!(full, PartialDate { year: 2014, month: Some(5), day: Some(9) });
        assert_eq!(full.to_string(), "2014-05-09");

        let year_only = date_parts(at(&doc, "year_only")).unwrap().unwrap();
        assert_eq!(year_only.to_string(), "1999");

        assert_eq!(date_parts(at(&doc, "absent")), Ok(None));
        assert_eq!(
            date_parts(at(&doc, "no_year")).unwrap_err().message(),
            "date has no year"
        );
        assert!(date_parts(at(&doc, "bad_month")).is_err());
    }

    #[test]
    fn test_partial_date_ordering() {
        let early = PartialDate { year: 2010, month: None, day: None };
        let later = PartialDate { year: 2010, month: Some(3), day: None };
        assert!(early < later);
    }
}
