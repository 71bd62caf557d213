//! Encoding detection and text normalization for raw export bytes.
//!
//! KakaoTalk exports arrive in whatever encoding the device felt like using:
//! UTF-8 with or without a BOM from recent Android builds, UTF-16 from some
//! Windows clients, EUC-KR (the windows-949 superset) from older phones.
//! This module tries an ordered candidate list and accepts the first encoding
//! that decodes the *entire* byte stream without error.
//!
//! Candidates are ordered by decreasing specificity: BOM-carrying forms are
//! tried first, since a BOM is unambiguous, and the permissive 8-bit
//! encodings come last. Decoding is strict — a file that no candidate decodes
//! cleanly is rejected with [`UnsupportedEncoding`](crate::TalkpackError::UnsupportedEncoding)
//! instead of being returned as mojibake.
//!
//! # Example
//!
//! ```rust
//! use talkpack::encoding::decode;
//!
//! let decoded = decode("\u{feff}안녕하세요\r\n".as_bytes())?;
//! assert_eq!(decoded.encoding, "UTF-8 (BOM)");
//! assert_eq!(decoded.text, "안녕하세요\n");
//! # Ok::<(), talkpack::TalkpackError>(())
//! ```

use std::borrow::Cow;

use encoding_rs::{EUC_KR, Encoding, SHIFT_JIS, UTF_8, UTF_16BE, UTF_16LE};

use crate::error::{Result, TalkpackError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Text recovered from raw export bytes.
///
/// Line endings are normalized to `\n` and any leading BOM character is
/// stripped, so downstream segmentation never has to care how the file was
/// produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded, normalized text content.
    pub text: String,
    /// Name of the encoding that decoded the byte stream.
    pub encoding: &'static str,
}

/// Candidate encodings, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    /// UTF-8 with a leading EF BB BF byte-order mark.
    Utf8Bom,
    /// UTF-16 little-endian with a leading FF FE byte-order mark.
    Utf16LeBom,
    /// UTF-16 big-endian with a leading FE FF byte-order mark.
    Utf16BeBom,
    /// Plain UTF-8 without a BOM.
    Utf8,
    /// EUC-KR (decoded as its windows-949 superset).
    EucKr,
    /// Shift_JIS (windows-31j).
    ShiftJis,
}

impl Candidate {
    /// All candidates, most specific first.
    const ALL: [Candidate; 6] = [
        Candidate::Utf8Bom,
        Candidate::Utf16LeBom,
        Candidate::Utf16BeBom,
        Candidate::Utf8,
        Candidate::EucKr,
        Candidate::ShiftJis,
    ];

    fn name(self) -> &'static str {
        match self {
            Candidate::Utf8Bom => "UTF-8 (BOM)",
            Candidate::Utf16LeBom => "UTF-16LE",
            Candidate::Utf16BeBom => "UTF-16BE",
            Candidate::Utf8 => "UTF-8",
            Candidate::EucKr => "EUC-KR",
            Candidate::ShiftJis => "Shift_JIS",
        }
    }

    /// Attempts a strict decode of the full byte stream.
    ///
    /// BOM-carrying candidates only apply when their BOM is present; the BOM
    /// bytes themselves are consumed. Returns `None` on any decode error.
    fn try_decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Candidate::Utf8Bom => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| decode_strict(UTF_8, rest)),
            Candidate::Utf16LeBom => bytes
                .strip_prefix(UTF16LE_BOM)
                .and_then(|rest| decode_strict(UTF_16LE, rest)),
            Candidate::Utf16BeBom => bytes
                .strip_prefix(UTF16BE_BOM)
                .and_then(|rest| decode_strict(UTF_16BE, rest)),
            Candidate::Utf8 => decode_strict(UTF_8, bytes),
            Candidate::EucKr => decode_strict(EUC_KR, bytes),
            Candidate::ShiftJis => decode_strict(SHIFT_JIS, bytes),
        }
    }
}

/// Strict single-encoding decode: any malformed sequence fails the whole
/// candidate instead of being replaced with U+FFFD.
fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

/// Decodes raw export bytes into normalized text.
///
/// Tries each candidate encoding in order and accepts the first that decodes
/// the full stream. The result has its leading BOM (if any survived decoding)
/// stripped and all CRLF/CR line endings rewritten to LF.
///
/// # Errors
///
/// Returns [`TalkpackError::UnsupportedEncoding`] when no candidate decodes
/// the byte stream cleanly, carrying the list of attempted encodings.
pub fn decode(bytes: &[u8]) -> Result<DecodedText> {
    for candidate in Candidate::ALL {
        if let Some(text) = candidate.try_decode(bytes) {
            return Ok(DecodedText {
                text: normalize(&text),
                encoding: candidate.name(),
            });
        }
    }

    Err(TalkpackError::unsupported_encoding(
        Candidate::ALL.iter().map(|c| c.name()).collect(),
    ))
}

/// Strips a leading BOM character and rewrites CRLF/CR line endings to LF.
pub(crate) fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
