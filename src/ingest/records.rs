// Raw record repair: turns a loosely-typed source record into a Post.
//
// Records come from a scraper and are frequently incomplete or mistyped. A
// missing or unusable field is never fatal: author becomes "[deleted]",
// counts become 0, text becomes empty, and numbers in text fields are read
// as their decimal form. Only a timestamp that is present but doesn't parse
// is reported as malformed, since no default would place the post correctly
// in time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::TrendsError;
use crate::models::{Post, DELETED_AUTHOR};

/// A source record as scraped. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default, alias = "body")]
    pub selftext: Option<Value>,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub num_comments: Option<Value>,
    #[serde(default, alias = "created_at")]
    pub created_utc: Option<Value>,
    /// Present when the record was already labeled by a previous run
    #[serde(default)]
    pub topic: Option<Value>,
}

/// Which fields had to be filled in with defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Repairs {
    pub id: bool,
    pub timestamp: bool,
    pub other: bool,
}

impl Repairs {
    pub fn any(&self) -> bool {
        self.id || self.timestamp || self.other
    }
}

impl RawRecord {
    /// Convert into a Post, filling defaults. `line` is the 1-based record
    /// position, used for synthetic ids and error messages.
    pub fn into_post(self, line: usize) -> Result<(Post, Repairs), TrendsError> {
        let mut repairs = Repairs::default();

        let id = match self.id.as_ref().and_then(value_to_id) {
            Some(id) => id,
            None => {
                repairs.id = true;
                let synthetic = format!("missing-{line}");
                warn!(line, id = %synthetic, "Record has no id; assigning a synthetic one");
                synthetic
            }
        };

        let created_at = match self.created_utc.as_ref().filter(|v| !v.is_null()) {
            Some(value) => parse_timestamp(value).ok_or_else(|| TrendsError::MalformedInput {
                line,
                reason: format!("unrecognized timestamp {value}"),
            })?,
            None => {
                repairs.timestamp = true;
                warn!(line, id = %id, "Record has no timestamp; using the Unix epoch");
                DateTime::<Utc>::UNIX_EPOCH
            }
        };

        let score = match self.score.as_ref().filter(|v| !v.is_null()) {
            Some(value) => value_to_i64(value).unwrap_or_else(|| {
                warn!(line, id = %id, value = %value, "Unusable score; using 0");
                repairs.other = true;
                0
            }),
            None => {
                repairs.other = true;
                0
            }
        };

        let num_comments = match self.num_comments.as_ref().filter(|v| !v.is_null()) {
            Some(value) => value_to_i64(value)
                .unwrap_or_else(|| {
                    warn!(line, id = %id, value = %value, "Unusable num_comments; using 0");
                    repairs.other = true;
                    0
                })
                .max(0) as u64,
            None => {
                repairs.other = true;
                0
            }
        };

        let title = text_value(self.title.as_ref(), "title", line);
        let body = text_value(self.selftext.as_ref(), "selftext", line);
        let author = text_value(self.author.as_ref(), "author", line);
        if title.is_none() || body.is_none() || author.is_none() {
            repairs.other = true;
        }
        let author = author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DELETED_AUTHOR.to_string());

        // An absent topic just means the record is unlabeled.
        let topic = text_value(self.topic.as_ref(), "topic", line);
        if topic.is_none() && self.topic.as_ref().is_some_and(|v| !v.is_null()) {
            repairs.other = true;
        }
        let topic = topic.filter(|t| !t.trim().is_empty());

        Ok((
            Post {
                id,
                title: title.unwrap_or_default(),
                body: body.unwrap_or_default(),
                author,
                score,
                num_comments,
                created_at,
                topic,
            },
            repairs,
        ))
    }
}

/// Read a free-text field. Numbers and booleans keep their JSON spelling, so
/// `"title": 2024` becomes "2024". Arrays and objects have no text form and
/// are dropped with a warning.
fn text_value(value: Option<&Value>, field: &'static str, line: usize) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            warn!(line, field, value = %other, "Unusable text field; leaving it empty");
            None
        }
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Parse the timestamp formats seen in scraped data: epoch seconds (number or
/// numeric string), RFC 3339, "YYYY-MM-DD HH:MM:SS", and bare dates.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                DateTime::from_timestamp(secs, 0)
            } else {
                n.as_f64().and_then(from_fractional_epoch)
            }
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn from_fractional_epoch(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Ok(secs) = s.parse::<f64>() {
        return from_fractional_epoch(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_complete_record() {
        let raw = record(json!({
            "id": "t3_abc",
            "title": "Metro phase 2",
            "selftext": "When does it open?",
            "author": "blr_commuter",
            "score": 42,
            "num_comments": 7,
            "created_utc": 1_609_459_200
        }));
        let (post, repairs) = raw.into_post(1).unwrap();
        assert!(!repairs.any());
        assert_eq!(post.id, "t3_abc");
        assert_eq!(post.body, "When does it open?");
        assert_eq!(post.created_at, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(post.topic, None);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let (post, repairs) = record(json!({})).into_post(9).unwrap();
        assert!(repairs.id && repairs.timestamp && repairs.other);
        assert_eq!(post.id, "missing-9");
        assert_eq!(post.author, DELETED_AUTHOR);
        assert_eq!(post.score, 0);
        assert_eq!(post.num_comments, 0);
        assert_eq!(post.title, "");
        assert_eq!(post.created_at.year(), 1970);
    }

    #[test]
    fn test_negative_score_kept_negative_comments_clamped() {
        let raw = record(json!({"id": 5, "score": -12, "num_comments": -1, "created_utc": "2019-05-04"}));
        let (post, _) = raw.into_post(1).unwrap();
        assert_eq!(post.id, "5");
        assert_eq!(post.score, -12);
        assert_eq!(post.num_comments, 0);
    }

    #[test]
    fn test_body_alias_and_string_numbers() {
        let raw = record(json!({"id": "x", "body": "text", "score": "17", "created_at": "2022-02-03 10:11:12"}));
        let (post, _) = raw.into_post(1).unwrap();
        assert_eq!(post.body, "text");
        assert_eq!(post.score, 17);
        assert_eq!(post.year_month(), "2022-02");
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp(&json!(1_614_587_400)), Some(expected));
        assert_eq!(parse_timestamp(&json!(1_614_587_400.0)), Some(expected));
        assert_eq!(parse_timestamp(&json!("1614587400")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2021-03-01T08:30:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2021-03-01T14:00:00+05:30")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2021-03-01 08:30:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
    }

    #[test]
    fn test_mistyped_fields_are_repaired() {
        let raw = record(json!({
            "id": "t3_x",
            "title": 2024,
            "selftext": ["not", "text"],
            "author": true,
            "score": "N/A",
            "num_comments": {"count": 3},
            "created_utc": 1_609_459_200
        }));
        let (post, repairs) = raw.into_post(2).unwrap();
        assert!(repairs.other);
        assert!(!repairs.id && !repairs.timestamp);
        assert_eq!(post.title, "2024");
        assert_eq!(post.body, "");
        assert_eq!(post.author, "true");
        assert_eq!(post.score, 0);
        assert_eq!(post.num_comments, 0);
    }

    #[test]
    fn test_missing_topic_is_not_a_repair() {
        let raw = record(json!({
            "id": "a", "title": "t", "selftext": "", "author": "u",
            "score": 1, "num_comments": 0, "created_utc": 0
        }));
        let (post, repairs) = raw.into_post(1).unwrap();
        assert!(!repairs.any());
        assert_eq!(post.topic, None);

        let raw = record(json!({"id": "b", "topic": 7, "created_utc": 0}));
        let (post, _) = raw.into_post(1).unwrap();
        assert_eq!(post.topic.as_deref(), Some("7"));
    }

    #[test]
    fn test_bad_timestamp_is_malformed() {
        let raw = record(json!({"id": "x", "created_utc": "not a date"}));
        let err = raw.into_post(3).unwrap_err();
        assert!(matches!(err, TrendsError::MalformedInput { line: 3, .. }));
    }
}
