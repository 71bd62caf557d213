//! Message-boundary parsing for KakaoTalk text exports.
//!
//! KakaoTalk produces structurally different exports depending on the client:
//!
//! - **Inline** (desktop): the full timestamp, speaker, and message share one
//!   line — `2024년 1월 15일 오후 3:45, 홍길동 : 메시지` (iOS writes the
//!   dotted variant `2024. 1. 15. 오후 3:45, …`).
//! - **Bracketed** (mobile/PC app): the speaker and a time-of-day share the
//!   line — `홍길동 [오후 3:45] 메시지` or `[홍길동] [오후 3:45] 메시지` —
//!   while the calendar date comes from standalone separator lines like
//!   `--------------- 2024년 1월 15일 월요일 ---------------`.
//!
//! The segmenter does not ask the caller which layout is in use. Each line is
//! classified independently ([`LineKind`]) and fed to a two-state machine:
//! a header line flushes the in-progress message and starts a new one; any
//! other non-blank line continues the current message body. This is what
//! keeps pasted text, code, and line-wrapped sentences together as one
//! logical message instead of splitting them into fragments.
//!
//! Losing content is worse than losing a timestamp: a line that matches a
//! header shape but whose date or time fails to parse still starts a new
//! message, just without a timestamp.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};

use crate::config::SegmenterConfig;
use crate::error::{Result, TalkpackError};
use crate::record::MessageRecord;

// Desktop export: 2024년 1월 15일 오후 3:45, 홍길동 : 메시지
static INLINE_KO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일\s*(?:(오전|오후|AM|PM)\s*)?(\d{1,2}):(\d{2}),\s*(.+?)\s*:\s?(.*)$",
    )
    .unwrap()
});

// iOS desktop export: 2024. 1. 15. 오후 3:45, 홍길동 : 메시지
static INLINE_DOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\.\s*(?:(오전|오후|AM|PM)\s*)?(\d{1,2}):(\d{2}),\s*(.+?)\s*:\s?(.*)$",
    )
    .unwrap()
});

// PC app export: [홍길동] [오후 3:45] 메시지
static BRACKET_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(.+?)\]\s*\[(?:(오전|오후|AM|PM)\s*)?(\d{1,2}):(\d{2})\]\s?(.*)$").unwrap()
});

// Mobile export: 홍길동 [오후 3:45] 메시지
static PLAIN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+\[(오전|오후|AM|PM)\s*(\d{1,2}):(\d{2})\]\s+(.+)$").unwrap()
});

// Date separator: --------------- 2024년 1월 15일 월요일 ---------------
static DATE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-+\s*(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일[^,]*-+$").unwrap()
});

// Bare date banner: 2024년 1월 15일 월요일
// Nothing but an optional weekday may follow the date, so an ordinary
// sentence that happens to start with a date stays message content.
static DATE_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})년\s*(\d{1,2})월\s*(\d{1,2})일\s*(?:(?:월|화|수|목|금|토|일)요일)?\s*$")
        .unwrap()
});

/// System notifications to drop when [`SegmenterConfig::skip_system_messages`]
/// is on. These carry no conversational content.
const SYSTEM_KEYWORDS: [&str; 11] = [
    "님이 들어왔습니다",
    "님이 나갔습니다",
    "님을 초대했습니다",
    "채팅방을 나갔습니다",
    "사진을 보냈습니다",
    "동영상을 보냈습니다",
    "파일을 보냈습니다",
    "이모티콘을 보냈습니다",
    "삭제된 메시지입니다",
    "님과 카카오톡 대화",
    "저장한 날짜",
];

/// Classification of a single normalized line.
#[derive(Debug, Clone, PartialEq)]
enum LineKind {
    /// The line starts a new message.
    Header(Header),
    /// A standalone date line; carries the date for bracketed headers.
    DateSeparator(Option<NaiveDate>),
    /// Anything else: body continuation, or pre-header noise.
    Text,
}

/// Fields recovered from a header line.
#[derive(Debug, Clone, PartialEq)]
struct Header {
    speaker: String,
    /// `None` when the header matched structurally but its date or time
    /// failed to parse.
    timestamp: Option<NaiveDateTime>,
    content: String,
}

fn num(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Converts a 12-hour clock reading to a 24-hour value.
///
/// 오후 12시 stays 12 (noon); 오전 12시 becomes 0 (midnight). Without a
/// marker the hour is taken as already 24-hour.
fn to_hour24(marker: Option<&str>, hour: u32) -> Option<u32> {
    match marker {
        Some("오후" | "PM" | "pm") => match hour {
            12 => Some(12),
            1..=11 => Some(hour + 12),
            _ => None,
        },
        Some("오전" | "AM" | "am") => match hour {
            12 => Some(0),
            0..=11 => Some(hour),
            _ => None,
        },
        Some(_) => None,
        None => (hour < 24).then_some(hour),
    }
}

/// Builds a header from an inline-layout match (full date on the line).
fn header_from_inline(caps: &Captures<'_>) -> Header {
    let speaker = caps.get(7).map_or("", |m| m.as_str()).trim().to_string();
    let content = caps.get(8).map_or("", |m| m.as_str()).to_string();

    let timestamp = (|| {
        let date =
            NaiveDate::from_ymd_opt(num(caps, 1)? as i32, num(caps, 2)?, num(caps, 3)?)?;
        let marker = caps.get(4).map(|m| m.as_str());
        let hour = to_hour24(marker, num(caps, 5)?)?;
        let time = NaiveTime::from_hms_opt(hour, num(caps, 6)?, 0)?;
        Some(date.and_time(time))
    })();

    Header {
        speaker,
        timestamp,
        content,
    }
}

/// Builds a header from a bracketed-layout match (time only; the date comes
/// from the most recent separator line, if any was seen).
fn header_from_bracketed(caps: &Captures<'_>, current_date: Option<NaiveDate>) -> Header {
    let speaker = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let content = caps.get(5).map_or("", |m| m.as_str()).to_string();

    let timestamp = (|| {
        let date = current_date?;
        let marker = caps.get(2).map(|m| m.as_str());
        let hour = to_hour24(marker, num(caps, 3)?)?;
        let time = NaiveTime::from_hms_opt(hour, num(caps, 4)?, 0)?;
        Some(date.and_time(time))
    })();

    Header {
        speaker,
        timestamp,
        content,
    }
}

/// Classifies one line given the date context accumulated so far.
fn classify(line: &str, current_date: Option<NaiveDate>) -> LineKind {
    if let Some(caps) = INLINE_KO.captures(line) {
        return LineKind::Header(header_from_inline(&caps));
    }
    if let Some(caps) = INLINE_DOT.captures(line) {
        return LineKind::Header(header_from_inline(&caps));
    }
    if let Some(caps) = BRACKET_NAME.captures(line) {
        return LineKind::Header(header_from_bracketed(&caps, current_date));
    }
    if let Some(caps) = PLAIN_NAME.captures(line) {
        return LineKind::Header(header_from_bracketed(&caps, current_date));
    }
    if let Some(caps) = DATE_SEPARATOR
        .captures(line)
        .or_else(|| DATE_BANNER.captures(line))
    {
        let date = (|| {
            NaiveDate::from_ymd_opt(num(&caps, 1)? as i32, num(&caps, 2)?, num(&caps, 3)?)
        })();
        return LineKind::DateSeparator(date);
    }
    LineKind::Text
}

/// Returns `true` if the accumulated message body is a KakaoTalk system
/// notification rather than something a participant typed.
fn is_system_message(content: &str) -> bool {
    SYSTEM_KEYWORDS.iter().any(|k| content.contains(k))
}

fn flush(records: &mut Vec<MessageRecord>, record: Option<MessageRecord>, config: &SegmenterConfig) {
    let Some(record) = record else { return };
    if record.is_empty() {
        return;
    }
    if config.skip_system_messages && is_system_message(&record.content) {
        return;
    }
    records.push(record);
}

/// Splits normalized export text into an ordered sequence of message records.
///
/// Records come out in file order with roles unresolved. Multi-line bodies
/// are preserved as one record; no message is split and no two messages are
/// merged. Lines occurring before the first header (export banners, saved-at
/// metadata) are discarded.
///
/// # Errors
///
/// Returns [`TalkpackError::UnrecognizedFormat`] when no line in the entire
/// file matches a message-header layout — an empty result would silently hide
/// the problem.
///
/// # Example
///
/// ```rust
/// use talkpack::config::SegmenterConfig;
/// use talkpack::segmenter::segment;
///
/// let text = "2024년 1월 15일 오후 3:45, 홍길동 : 안녕하세요\n이어지는 줄";
/// let records = segment(text, &SegmenterConfig::new())?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].content, "안녕하세요\n이어지는 줄");
/// # Ok::<(), talkpack::TalkpackError>(())
/// ```
pub fn segment(text: &str, config: &SegmenterConfig) -> Result<Vec<MessageRecord>> {
    let mut records: Vec<MessageRecord> = Vec::new();
    let mut current: Option<MessageRecord> = None;
    let mut current_date: Option<NaiveDate> = None;
    let mut saw_header = false;

    for line in text.lines() {
        match classify(line, current_date) {
            LineKind::Header(header) => {
                saw_header = true;
                flush(&mut records, current.take(), config);
                let mut record = MessageRecord::new(header.speaker, header.content);
                record.timestamp = header.timestamp;
                current = Some(record);
            }
            LineKind::DateSeparator(date) => {
                if let Some(date) = date {
                    current_date = Some(date);
                }
            }
            LineKind::Text => {
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(record) = current.as_mut() {
                    record.append_line(line);
                }
            }
        }
    }
    flush(&mut records, current.take(), config);

    if !saw_header {
        return Err(TalkpackError::unrecognized_format(
            "no line matched a known KakaoTalk message header layout",
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SegmenterConfig {
        SegmenterConfig::new()
    }

    #[test]
    fn test_inline_header() {
        let records = segment("2024년 1월 15일 오후 3:45, 홍길동 : 안녕", &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker_name, "홍길동");
        assert_eq!(records[0].content, "안녕");
        let ts = records[0].timestamp.unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 15:45");
    }

    #[test]
    fn test_inline_dotted_header() {
        let records = segment("2024. 1. 15. 오전 9:05, Alice : hi", &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker_name, "Alice");
        let ts = records[0].timestamp.unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "09:05");
    }

    #[test]
    fn test_bracketed_header_with_date_separator() {
        let text = "--------------- 2024년 1월 15일 월요일 ---------------\n\
                    [홍길동] [오후 3:45] 안녕하세요";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        let ts = records[0].timestamp.unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 15:45");
    }

    #[test]
    fn test_plain_name_header() {
        let text = "2024년 1월 15일 월요일\n홍길동 [오전 11:02] 점심 먹자";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker_name, "홍길동");
        assert_eq!(records[0].content, "점심 먹자");
        assert_eq!(
            records[0].timestamp.unwrap().format("%H:%M").to_string(),
            "11:02"
        );
    }

    #[test]
    fn test_bracketed_header_without_date_degrades() {
        // No separator seen yet: content survives, timestamp does not.
        let records = segment("[홍길동] [오후 3:45] 안녕", &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "안녕");
        assert!(records[0].timestamp.is_none());
    }

    #[test]
    fn test_unparseable_time_degrades_to_untimed() {
        let records =
            segment("2024년 1월 15일 오후 13:30, 홍길동 : 내용은 남는다", &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker_name, "홍길동");
        assert_eq!(records[0].content, "내용은 남는다");
        assert!(records[0].timestamp.is_none());
    }

    #[test]
    fn test_unparseable_date_degrades_to_untimed() {
        let records = segment("2024년 13월 40일 오후 3:45, 나 : hi", &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].timestamp.is_none());
    }

    #[test]
    fn test_multiline_body_stays_one_record() {
        let text = "2024년 1월 15일 오후 3:45, 홍길동 : 첫 줄\n둘째 줄\n셋째 줄";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "첫 줄\n둘째 줄\n셋째 줄");
    }

    #[test]
    fn test_two_messages_not_merged() {
        let text = "2024년 1월 15일 오후 3:45, A : one\n\
                    2024년 1월 15일 오후 3:46, B : two";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "one");
        assert_eq!(records[1].content, "two");
    }

    #[test]
    fn test_preheader_lines_discarded() {
        let text = "배너 줄입니다\n잡음\n2024년 1월 15일 오후 3:45, A : hi";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "hi");
    }

    #[test]
    fn test_no_headers_is_unrecognized_format() {
        let err = segment("그냥 텍스트\n헤더 없음", &cfg()).unwrap_err();
        assert!(err.is_unrecognized_format());
    }

    #[test]
    fn test_empty_text_is_unrecognized_format() {
        assert!(segment("", &cfg()).unwrap_err().is_unrecognized_format());
    }

    #[test]
    fn test_system_messages_skipped_by_default() {
        let text = "2024년 1월 15일 오후 3:45, A : 사진을 보냈습니다\n\
                    2024년 1월 15일 오후 3:46, A : 진짜 메시지";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "진짜 메시지");
    }

    #[test]
    fn test_system_messages_kept_when_configured() {
        let text = "2024년 1월 15일 오후 3:45, A : 사진을 보냈습니다";
        let config = SegmenterConfig::new().with_skip_system_messages(false);
        let records = segment(text, &config).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_blank_lines_between_messages_ignored() {
        let text = "2024년 1월 15일 오후 3:45, A : one\n\n\n\
                    2024년 1월 15일 오후 3:46, B : two";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_hour_conversion() {
        assert_eq!(to_hour24(Some("오전"), 12), Some(0));
        assert_eq!(to_hour24(Some("오전"), 9), Some(9));
        assert_eq!(to_hour24(Some("오후"), 12), Some(12));
        assert_eq!(to_hour24(Some("오후"), 3), Some(15));
        assert_eq!(to_hour24(Some("오후"), 13), None);
        assert_eq!(to_hour24(Some("PM"), 11), Some(23));
        assert_eq!(to_hour24(None, 23), Some(23));
        assert_eq!(to_hour24(None, 24), None);
    }

    #[test]
    fn test_noon_and_midnight() {
        let noon = segment("2024년 1월 15일 오후 12:00, A : 점심", &cfg()).unwrap();
        assert_eq!(
            noon[0].timestamp.unwrap().format("%H:%M").to_string(),
            "12:00"
        );
        let midnight = segment("2024년 1월 15일 오전 12:30, A : 야식", &cfg()).unwrap();
        assert_eq!(
            midnight[0].timestamp.unwrap().format("%H:%M").to_string(),
            "00:30"
        );
    }

    #[test]
    fn test_date_separator_carries_to_later_headers() {
        let text = "--------------- 2024년 1월 15일 월요일 ---------------\n\
                    [A] [오전 9:00] 아침\n\
                    --------------- 2024년 1월 16일 화요일 ---------------\n\
                    [A] [오전 9:00] 다음날 아침";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].timestamp.unwrap().format("%d").to_string(),
            "15"
        );
        assert_eq!(
            records[1].timestamp.unwrap().format("%d").to_string(),
            "16"
        );
    }

    #[test]
    fn test_date_in_sentence_is_not_a_separator() {
        // A body line that merely starts with a date must stay content.
        let text = "2024년 1월 15일 오후 3:45, 나 : 일정 공유\n\
                    2024년 2월 1일 약속 잊지마";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "일정 공유\n2024년 2월 1일 약속 잊지마");
    }

    #[test]
    fn test_content_with_colon_keeps_split_at_first_colon() {
        let records =
            segment("2024년 1월 15일 오후 3:45, 홍길동 : 주소: 서울시", &cfg()).unwrap();
        assert_eq!(records[0].speaker_name, "홍길동");
        assert_eq!(records[0].content, "주소: 서울시");
    }

    #[test]
    fn test_mixed_layouts_in_one_file() {
        let text = "2024년 1월 15일 오후 3:45, A : inline\n\
                    2024년 1월 16일 화요일\n\
                    [B] [오전 9:00] bracketed";
        let records = segment(text, &cfg()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].speaker_name, "A");
        assert_eq!(records[1].speaker_name, "B");
    }
}
