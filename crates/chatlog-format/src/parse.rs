//! Chat line parsing.

use chatlog_types::{ChatLine, LINE_TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

/// `[timestamp] #channel username: message`
///
/// The timestamp runs up to the first `]`; the username runs up to the first `:`.
static CHAT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]*)\]\s*#(\w+)\s+([^:]+):(.+)$").expect("chat line regex is valid")
});

/// Parses one log line.
///
/// Surrounding whitespace is ignored. Returns `None` for empty lines, lines
/// without a leading `[timestamp]`, timestamps not in `YYYY-MM-DD HH:MM:SS`
/// form, and lines missing the `#channel user:` prefix.
///
/// # Example
///
/// ```
/// use chatlog_format::parse_chat_line;
///
/// let line = parse_chat_line("[2023-05-01 10:00:00] #foo bar: hello world", "logs/a.txt").unwrap();
/// assert_eq!(line.channel, "foo");
/// assert_eq!(line.username, "bar");
/// assert_eq!(line.message, "hello world");
/// ```
#[must_use]
pub fn parse_chat_line(line: &str, source_file: &str) -> Option<ChatLine> {
    let caps = CHAT_LINE_RE.captures(line.trim())?;
    let timestamp = NaiveDateTime::parse_from_str(caps[1].trim(), LINE_TIMESTAMP_FORMAT).ok()?;

    Some(ChatLine::new(
        timestamp,
        &caps[2],
        caps[3].trim(),
        caps[4].trim(),
        source_file,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_basic_line() {
        let line = parse_chat_line("[2023-05-01 10:00:00] #foo bar: hello world", "x.txt").unwrap();

        let expected_ts = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(line.timestamp, expected_ts);
        assert_eq!(line.channel, "foo");
        assert_eq!(line.username, "bar");
        assert_eq!(line.message, "hello world");
        assert_eq!(line.source_file, "x.txt");
    }

    #[test]
    fn test_message_keeps_colons_and_punctuation() {
        let line = parse_chat_line(
            "[2023-05-01 10:00:00] #foo bar: time is 10:30, ok? :) https://x.y/z",
            "x.txt",
        )
        .unwrap();
        assert_eq!(line.username, "bar");
        assert_eq!(line.message, "time is 10:30, ok? :) https://x.y/z");
    }

    #[test]
    fn test_surrounding_whitespace() {
        let line = parse_chat_line("  [2023-05-01 10:00:00]   #foo   bar  :  hi  \r\n", "x.txt").unwrap();
        assert_eq!(line.username, "bar");
        assert_eq!(line.message, "hi");
    }

    #[test]
    fn test_unicode_channel_and_message() {
        let line = parse_chat_line("[2023-05-01 10:00:00] #föö bär: héllo 👋", "x.txt").unwrap();
        assert_eq!(line.channel, "föö");
        assert_eq!(line.message, "héllo 👋");
    }

    #[test]
    fn test_missing_timestamp_yields_nothing() {
        assert!(parse_chat_line("#foo bar: hello world", "x.txt").is_none());
        assert!(parse_chat_line("2023-05-01 10:00:00 #foo bar: hello", "x.txt").is_none());
    }

    #[test]
    fn test_malformed_lines_yield_nothing() {
        let cases = [
            "",
            "   ",
            "[not a date] #foo bar: hi",
            "[2023-05-01T10:00:00] #foo bar: hi",
            "[2023-05-01 10:00:00] foo bar: hi",
            "[2023-05-01 10:00:00] #foo bar hi",
            "[2023-05-01 10:00:00] #foo bar:",
            "[2023-05-01 10:00:00] #foo: hi",
        ];
        for case in cases {
            assert!(parse_chat_line(case, "x.txt").is_none(), "parsed {case:?}");
        }
    }
}
