//! Line format for persisted items.
//!
//! Each record is one physical line:
//!
//! ```text
//! <start:YYYY-MM-DD_HH:MM:SS>[ <end:YYYY-MM-DD_HH:MM:SS>][ <comment>]
//! ```
//!
//! Line breaks inside a comment are stored as the two-character sequences
//! `\n` and `\r` so that a record never spans more than one line, and a
//! literal backslash is stored as `\\`. A backslash followed by any other
//! character is read verbatim.
//!
//! An open item whose comment starts with a timestamp-shaped word would read
//! back as a finished item, so that comment is written with a leading `\`.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

use crate::item::{TimeTrackingItem, ValidationError};

/// `chrono` format string for persisted timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Fixed-width shape of a timestamp token. `chrono` alone accepts
/// variable-width fields, so the shape is checked first.
static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}_\d{2}:\d{2}:\d{2}$").unwrap());

const SEPARATOR: char = ' ';
const ESCAPE: char = '\\';

/// Errors raised while decoding a single record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The record holds no start timestamp at all.
    #[error("record has no start timestamp")]
    MissingStart,

    /// A timestamp token has the wrong shape or an impossible calendar value.
    #[error("malformed timestamp `{token}`, expected YYYY-MM-DD_HH:MM:SS")]
    MalformedTimestamp { token: String },

    /// The end timestamp is before the start timestamp.
    #[error("end {end} is before start {start}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// The record bytes are not UTF-8.
    #[error("record is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

impl From<ValidationError> for ParseError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EndBeforeStart { start, end } => Self::EndBeforeStart { start, end },
        }
    }
}

/// Decodes one record into an item.
pub fn decode(record: &str) -> Result<TimeTrackingItem, ParseError> {
    if record.trim().is_empty() {
        return Err(ParseError::MissingStart);
    }

    let (start_token, rest) = split_token(record);
    let start = parse_timestamp(start_token)?;

    let Some(rest) = rest else {
        return Ok(TimeTrackingItem::new(None, start));
    };

    let (second_token, after_second) = split_token(rest);
    if TIMESTAMP_RE.is_match(second_token) {
        let end = parse_timestamp(second_token)?;
        let comment = after_second.and_then(unescape_comment);
        return Ok(TimeTrackingItem::finished(comment, start, end)?);
    }

    let comment = rest
        .strip_prefix(ESCAPE)
        .filter(|escaped| TIMESTAMP_RE.is_match(split_token(escaped).0))
        .unwrap_or(rest);
    Ok(TimeTrackingItem::new(unescape_comment(comment), start))
}

/// Encodes an item as a single physical line (without line terminator).
pub fn encode(item: &TimeTrackingItem) -> String {
    let mut line = format_timestamp(item.start());
    if let Some(end) = item.end() {
        line.push(SEPARATOR);
        line.push_str(&format_timestamp(end));
    }
    if let Some(comment) = item.comment() {
        let escaped = escape_comment(comment);
        line.push(SEPARATOR);
        if item.is_ongoing() && TIMESTAMP_RE.is_match(split_token(&escaped).0) {
            line.push(ESCAPE);
        }
        line.push_str(&escaped);
    }
    line
}

/// Parses a single `YYYY-MM-DD_HH:MM:SS` token.
pub fn parse_timestamp(token: &str) -> Result<NaiveDateTime, ParseError> {
    let malformed = || ParseError::MalformedTimestamp {
        token: token.to_string(),
    };
    if !TIMESTAMP_RE.is_match(token) {
        return Err(malformed());
    }
    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT).map_err(|_| malformed())
}

/// Formats a timestamp in the persisted format. Sub-second precision is dropped.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Splits off the first token; the remainder excludes the single separator.
fn split_token(text: &str) -> (&str, Option<&str>) {
    match text.split_once(SEPARATOR) {
        Some((token, rest)) => (token, Some(rest)),
        None => (text, None),
    }
}

fn unescape_comment(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let mut comment = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            comment.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => comment.push('\n'),
            Some('r') => comment.push('\r'),
            Some(ESCAPE) => comment.push(ESCAPE),
            Some(other) => {
                comment.push(ESCAPE);
                comment.push(other);
            }
            None => comment.push(ESCAPE),
        }
    }
    Some(comment)
}

fn escape_comment(comment: &str) -> String {
    let mut escaped = String::with_capacity(comment.len());
    for c in comment.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            ESCAPE => escaped.push_str("\\\\"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn only_start_time_given() {
        let item = decode("2012-10-10_22:00:00").unwrap();
        assert_eq!(item.start(), ts(2012, 10, 10, 22, 0, 0));
        assert_eq!(item.end(), None);
        assert_eq!(item.comment(), None);
    }

    #[test]
    fn multiline_comment_is_unescaped() {
        let item = decode(
            r"2012-10-10_22:00:00 2012-11-10_22:00:01 this is\n a multiline\r string\r\n with different separators",
        )
        .unwrap();
        assert_eq!(item.start(), ts(2012, 10, 10, 22, 0, 0));
        assert_eq!(item.end(), Some(ts(2012, 11, 10, 22, 0, 1)));
        assert_eq!(
            item.comment(),
            Some("this is\n a multiline\r string\r\n with different separators")
        );
    }

    #[test]
    fn start_and_end_without_comment() {
        let item = decode("2012-10-10_22:00:00 2012-10-10_23:00:00").unwrap();
        assert_eq!(item.end(), Some(ts(2012, 10, 10, 23, 0, 0)));
        assert_eq!(item.comment(), None);
    }

    #[test]
    fn trailing_separator_leaves_comment_absent() {
        let item = decode("2012-10-10_22:00:00 2012-10-10_23:00:00 ").unwrap();
        assert_eq!(item.comment(), None);
    }

    #[test]
    fn comment_whitespace_is_preserved() {
        let item = decode("2012-10-10_22:00:00 2012-10-10_23:00:00   indented ").unwrap();
        assert_eq!(item.comment(), Some("  indented "));
    }

    #[test]
    fn open_item_with_comment() {
        let item = decode("2012-10-10_22:00:00 reading mail").unwrap();
        assert_eq!(item.end(), None);
        assert_eq!(item.comment(), Some("reading mail"));
    }

    #[test]
    fn malformed_first_token_fails() {
        for record in [
            "hello",
            "2012-10-10 22:00:00",
            "2012-1-10_22:00:00",
            "12-10-10_22:00:00",
            "2012-10-10_22:00",
            "2012-10-10_22:00:00x",
            "abcd-ef-gh_ij:kl:mn 2012-10-10_23:00:00",
        ] {
            let err = decode(record).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedTimestamp { .. }),
                "{record:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn out_of_range_values_fail() {
        for record in [
            "2012-13-10_22:00:00",
            "2012-02-30_22:00:00",
            "2012-10-10_25:00:00",
            "2012-10-10_22:00:00 2012-10-10_22:61:00",
        ] {
            assert!(
                matches!(decode(record), Err(ParseError::MalformedTimestamp { .. })),
                "{record:?} should fail"
            );
        }
    }

    #[test]
    fn empty_record_has_no_start() {
        assert_eq!(decode(""), Err(ParseError::MissingStart));
        assert_eq!(decode("   "), Err(ParseError::MissingStart));
    }

    #[test]
    fn end_before_start_fails() {
        assert_eq!(
            decode("2012-10-10_22:00:00 2012-10-10_21:00:00 oops"),
            Err(ParseError::EndBeforeStart {
                start: ts(2012, 10, 10, 22, 0, 0),
                end: ts(2012, 10, 10, 21, 0, 0),
            })
        );
    }

    #[test]
    fn encode_writes_single_line() {
        let item = TimeTrackingItem::finished(
            Some("line one\nline two\r\nline three\rend".into()),
            ts(2024, 1, 2, 8, 0, 0),
            ts(2024, 1, 2, 9, 30, 15),
        )
        .unwrap();
        assert_eq!(
            encode(&item),
            r"2024-01-02_08:00:00 2024-01-02_09:30:15 line one\nline two\r\nline three\rend"
        );
    }

    #[test]
    fn encode_open_item() {
        let item = TimeTrackingItem::new(None, ts(2024, 1, 2, 8, 0, 0));
        assert_eq!(encode(&item), "2024-01-02_08:00:00");
    }

    #[test]
    fn newline_mixes_survive_encode_decode() {
        let comments = [
            "\n",
            "\r",
            "\r\n",
            "\n\r",
            "a\r\r\nb\n\nc",
            "\r\n\n\r\r\n",
            "trailing\r",
            " leading space and\nnewline ",
        ];
        for comment in comments {
            let item = TimeTrackingItem::finished(
                Some(comment.to_string()),
                ts(2024, 5, 6, 7, 8, 9),
                ts(2024, 5, 6, 10, 0, 0),
            )
            .unwrap();
            let line = encode(&item);
            assert!(!line.contains(['\n', '\r']), "{line:?}");
            assert_eq!(decode(&line).unwrap(), item, "comment {comment:?}");
        }
    }

    #[test]
    fn backslashes_survive_encode_decode() {
        let item = TimeTrackingItem::finished(
            Some(r"C:\new\readme and \\server".into()),
            ts(2024, 1, 2, 8, 0, 0),
            ts(2024, 1, 2, 9, 0, 0),
        )
        .unwrap();
        let line = encode(&item);
        assert_eq!(
            line,
            r"2024-01-02_08:00:00 2024-01-02_09:00:00 C:\\new\\readme and \\\\server"
        );
        assert_eq!(decode(&line).unwrap(), item);
    }

    #[test]
    fn unknown_escapes_are_kept() {
        let item = decode(r"2024-01-02_08:00:00 2024-01-02_09:00:00 C:\path\to\ trailing\").unwrap();
        assert_eq!(item.comment(), Some(r"C:\path\to\ trailing\"));
    }

    #[test]
    fn open_item_comment_starting_with_timestamp() {
        for comment in [
            "2024-03-01_00:00:00 catch up",
            "2024-03-04_17:00:00 deadline",
            "2024-03-04_17:00:00",
            "2024-13-45_99:99:99 not a date",
        ] {
            let item = TimeTrackingItem::new(Some(comment.into()), ts(2024, 3, 4, 9, 0, 0));
            let line = encode(&item);
            assert_eq!(line, format!(r"2024-03-04_09:00:00 \{comment}"));
            assert_eq!(decode(&line).unwrap(), item, "comment {comment:?}");
        }
    }

    #[test]
    fn leading_backslash_without_timestamp_is_literal() {
        let item = TimeTrackingItem::new(
            Some(r"\2024-03-04_17:00:00 odd".into()),
            ts(2024, 3, 4, 9, 0, 0),
        );
        let line = encode(&item);
        assert_eq!(line, r"2024-03-04_09:00:00 \\2024-03-04_17:00:00 odd");
        assert_eq!(decode(&line).unwrap(), item);

        let item = decode(r"2024-03-04_09:00:00 \home").unwrap();
        assert_eq!(item.comment(), Some(r"\home"));
    }
}
