use crate::event::LogEntry;
use chrono::{DateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// <timestamp> [<level>] <service>: <rest>
const LINE_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}(?:Z|[+-]\d{2}:\d{2})) \[([^\s\[\]]+)\] (\S+): (.*)$";
const REQUEST_ID_PATTERN: &str = r"request_id=([A-Za-z0-9_]+)";
const USER_ID_PATTERN: &str = r"user_id=([A-Za-z0-9_]+)";

static LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(LINE_PATTERN).expect("failed to compile line grammar regex"));
static REQUEST_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(REQUEST_ID_PATTERN).expect("failed to compile request_id regex"));
static USER_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(USER_ID_PATTERN).expect("failed to compile user_id regex"));

/// Why a line was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedLine {
    #[error("line does not match '<timestamp> [<level>] <service>: <message>, ...'")]
    NoMatch,

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("no comma-terminated message after the service name")]
    MissingMessage,
}

/// Data-quality signal for a line that parsed but lacks optional ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionQuality {
    pub missing_request_id: bool,
    pub missing_user_id: bool,
}

impl ExtractionQuality {
    pub fn is_degraded(&self) -> bool {
        self.missing_request_id || self.missing_user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub entry: LogEntry,
    pub quality: ExtractionQuality,
}

/// Parse one line of the fixed request-log grammar.
///
/// The grammar is checked first; id extraction and message splitting only
/// run on lines that match it. Missing `request_id=`/`user_id=` fields
/// degrade the entry (empty value plus a quality flag) instead of
/// rejecting it, while a missing comma after the message rejects the line.
pub fn parse_line(line: &str) -> Result<ParsedLine, MalformedLine> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let caps = LINE_REGEX.captures(line).ok_or(MalformedLine::NoMatch)?;
    // All four groups are mandatory in the pattern
    let ts_str = &caps[1];
    let level = &caps[2];
    let service = &caps[3];
    let rest = &caps[4];

    let timestamp = parse_timestamp(ts_str)?;

    let request_id = first_capture(&REQUEST_ID_REGEX, rest);
    let user_id = first_capture(&USER_ID_REGEX, rest);

    let message = match rest.split_once(',') {
        Some((msg, _)) if !msg.is_empty() => msg,
        _ => return Err(MalformedLine::MissingMessage),
    };

    let quality = ExtractionQuality {
        missing_request_id: request_id.is_none(),
        missing_user_id: user_id.is_none(),
    };

    Ok(ParsedLine {
        entry: LogEntry {
            timestamp,
            level: level.to_string(),
            service: service.to_string(),
            message: message.to_string(),
            request_id: request_id.unwrap_or_default().to_string(),
            user_id: user_id.unwrap_or_default().to_string(),
        },
        quality,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MalformedLine> {
    let dt = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| MalformedLine::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })?;

    // chrono stores second 60 as an overflowing nanosecond field
    if dt.nanosecond() >= 1_000_000_000 {
        return Err(MalformedLine::InvalidTimestamp {
            value: value.to_string(),
            reason: "second out of range".to_string(),
        });
    }

    Ok(dt)
}

fn first_capture<'a>(regex: &Regex, text: &'a str) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use proptest::prelude::*;

    const SAMPLE: &str = "2023-12-25T14:30:15.123Z [ERROR] user-service: User authentication failed, request_id=req_abc123, user_id=12345";

    #[test]
    fn test_parse_reference_line() {
        let parsed = parse_line(SAMPLE).unwrap();
        let e = &parsed.entry;

        assert_eq!(e.timestamp.year(), 2023);
        assert_eq!(e.timestamp.month(), 12);
        assert_eq!(e.timestamp.day(), 25);
        assert_eq!(e.timestamp.hour(), 14);
        assert_eq!(e.timestamp.minute(), 30);
        assert_eq!(e.timestamp.second(), 15);
        assert_eq!(e.timestamp.timestamp_subsec_millis(), 123);
        assert_eq!(e.level, "ERROR");
        assert_eq!(e.service, "user-service");
        assert_eq!(e.message, "User authentication failed");
        assert_eq!(e.request_id, "req_abc123");
        assert_eq!(e.user_id, "12345");
        assert!(!parsed.quality.is_degraded());
    }

    #[test]
    fn test_missing_request_id_degrades() {
        let line = "2023-12-25T14:30:15.123Z [INFO] api: health check ok, user_id=7";
        let parsed = parse_line(line).unwrap();
        assert_eq!(parsed.entry.request_id, "");
        assert_eq!(parsed.entry.user_id, "7");
        assert!(parsed.quality.missing_request_id);
        assert!(!parsed.quality.missing_user_id);
    }

    #[test]
    fn test_missing_user_id_degrades() {
        let line = "2023-12-25T14:30:15.123Z [INFO] api: started, request_id=req_9";
        let parsed = parse_line(line).unwrap();
        assert_eq!(parsed.entry.request_id, "req_9");
        assert_eq!(parsed.entry.user_id, "");
        assert!(parsed.quality.missing_user_id);
        assert!(parsed.quality.is_degraded());
    }

    #[test]
    fn test_no_comma_is_malformed() {
        let line = "2023-12-25T14:30:15.123Z [ERROR] api: request_id=req_1 without comma";
        assert_eq!(parse_line(line), Err(MalformedLine::MissingMessage));
    }

    #[test]
    fn test_empty_message_is_malformed() {
        let line = "2023-12-25T14:30:15.123Z [ERROR] api: , request_id=req_1";
        assert_eq!(parse_line(line), Err(MalformedLine::MissingMessage));
    }

    #[test]
    fn test_grammar_mismatches() {
        let cases = [
            "",
            "not a log line at all",
            // seconds without millis
            "2023-12-25T14:30:15Z [ERROR] api: boom, request_id=r",
            // missing brackets
            "2023-12-25T14:30:15.123Z ERROR api: boom, request_id=r",
            // missing colon after service
            "2023-12-25T14:30:15.123Z [ERROR] api boom, request_id=r",
            // leading garbage
            "x 2023-12-25T14:30:15.123Z [ERROR] api: boom, request_id=r",
            // empty level
            "2023-12-25T14:30:15.123Z [] api: boom, request_id=r",
        ];
        for line in cases {
            assert_eq!(parse_line(line), Err(MalformedLine::NoMatch), "{line:?}");
        }
    }

    #[test]
    fn test_invalid_calendar_value() {
        let line = "2023-02-30T14:30:15.123Z [ERROR] api: boom, request_id=r";
        match parse_line(line) {
            Err(MalformedLine::InvalidTimestamp { value, .. }) => {
                assert_eq!(value, "2023-02-30T14:30:15.123Z")
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_second_sixty_is_rejected() {
        let line = "2023-12-25T14:30:60.123Z [ERROR] api: boom, request_id=r1";
        match parse_line(line) {
            Err(MalformedLine::InvalidTimestamp { value, reason }) => {
                assert_eq!(value, "2023-12-25T14:30:60.123Z");
                assert!(reason.contains("second"));
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
        // 23:59:60 is no exception
        assert!(parse_line("2016-12-31T23:59:60.000Z [ERROR] api: boom, request_id=r1").is_err());
    }

    #[test]
    fn test_offset_normalised_to_utc() {
        let line = "2023-12-25T16:30:15.123+02:00 [WARN] api: slow, request_id=r1";
        let e = parse_line(line).unwrap().entry;
        let expected = Utc.with_ymd_and_hms(2023, 12, 25, 14, 30, 15).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(e.timestamp, expected);
        assert_eq!(e.formatted_timestamp(), "2023-12-25T14:30:15.123Z");
    }

    #[test]
    fn test_trailing_carriage_return_ignored() {
        let line = format!("{}\r", SAMPLE);
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.entry.user_id, "12345");
    }

    #[test]
    fn test_message_stops_at_first_comma() {
        let line = "2023-12-25T14:30:15.123Z [INFO] db: a, b, c, request_id=r";
        assert_eq!(parse_line(line).unwrap().entry.message, "a");
    }

    #[test]
    fn test_service_stops_at_first_colon_space() {
        let line = "2023-12-25T14:30:15.123Z [INFO] db: note: more, request_id=r";
        let e = parse_line(line).unwrap().entry;
        assert_eq!(e.service, "db");
        assert_eq!(e.message, "note: more");
    }

    #[test]
    fn test_level_is_free_form() {
        let line = "2023-12-25T14:30:15.123Z [SUPERERROR] db: x, request_id=r";
        assert_eq!(parse_line(line).unwrap().entry.level, "SUPERERROR");
    }

    #[test]
    fn test_request_id_first_match_wins() {
        let line = "2023-12-25T14:30:15.123Z [INFO] db: x, request_id=first, request_id=second";
        assert_eq!(parse_line(line).unwrap().entry.request_id, "first");
    }

    proptest! {
        #[test]
        fn prop_parse_is_deterministic(
            level in "[A-Z]{1,8}",
            service in "[a-z][a-z-]{0,12}",
            msg in "[A-Za-z ]{1,24}",
            rid in "[A-Za-z0-9_]{1,12}",
        ) {
            let line = format!("2024-03-01T08:09:10.456Z [{}] {}: {}, request_id={}", level, service, msg, rid);
            let first = parse_line(&line);
            let second = parse_line(&line);
            prop_assert!(first.is_ok());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_no_comma_always_rejected(
            level in "[A-Z]{1,8}",
            service in "[a-z][a-z-]{0,12}",
            rest in "[^,\r\n]{0,40}",
        ) {
            let line = format!("2024-03-01T08:09:10.456Z [{}] {}: {}", level, service, rest);
            prop_assert_eq!(parse_line(&line), Err(MalformedLine::MissingMessage));
        }
    }
}
