//! Recover JSON from LLM output.
//!
//! Models wrap JSON in markdown fences, leave trailing commas, emit LaTeX-ish
//! backslashes (`\frac`, `\alpha`) and raw control characters. The cleanup
//! here is deliberately lossy: it only has to yield something `serde_json`
//! accepts.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([\]}])").unwrap();
}

/// Escape-repair passes attempted before giving up.
pub const MAX_REPAIR_ATTEMPTS: usize = 5;

/// Characters of the raw response kept for error reporting.
const RAW_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JsonRepairError {
    #[error("{message}")]
    Invalid { message: String, raw_preview: String },
}

impl JsonRepairError {
    pub fn raw_preview(&self) -> &str {
        match self {
            Self::Invalid { raw_preview, .. } => raw_preview,
        }
    }
}

/// Normalize LLM text into a JSON candidate.
pub fn clean_json_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let unfenced = strip_code_fence(text).trim();
    let without_commas = TRAILING_COMMA.replace_all(unfenced, "$1");
    let escaped = escape_stray_backslashes(&without_commas);
    let cleaned = strip_control_chars(&escaped);

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => cleaned[start..=end].to_string(),
        _ => cleaned,
    }
}

/// Text between the first and last ``` fence, minus the language tag line.
fn strip_code_fence(text: &str) -> &str {
    let (Some(start), Some(end)) = (text.find("```"), text.rfind("```")) else {
        return text;
    };
    if end <= start {
        return text;
    }

    match text[start..].find('\n').map(|i| start + i) {
        Some(line_end) if line_end < end => &text[line_end..end],
        _ => &text[start + 3..end],
    }
}

/// Double any backslash that does not begin a valid JSON escape.
fn escape_stray_backslashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some(next @ ('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't')) => {
                out.push('\\');
                out.push(next);
                chars.next();
            }
            Some('u') if is_unicode_escape(chars.clone()) => {
                out.push('\\');
            }
            _ => out.push_str("\\\\"),
        }
    }

    out
}

/// `chars` is positioned at the `u` of a `\u` sequence.
fn is_unicode_escape(mut chars: impl Iterator<Item = char>) -> bool {
    chars.next();
    (0..4).all(|_| chars.next().is_some_and(|c| c.is_ascii_hexdigit()))
}

/// `\n`, `\r` and `\t` become spaces; other C0/C1 control characters go.
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' => None,
            other => Some(other),
        })
        .collect()
}

/// Repeatedly double the backslash behind an "invalid escape" parse error.
///
/// Returns the last candidate text, whether or not it finally parses. Stops
/// early on success, on any other kind of error, or when the offending
/// backslash cannot be located.
pub fn repair_invalid_escapes(text: &str, max_attempts: usize) -> String {
    let mut current = text.to_string();

    for attempt in 1..=max_attempts {
        let err = match serde_json::from_str::<serde_json::Value>(&current) {
            Ok(_) => return current,
            Err(e) => e,
        };

        if !err.to_string().starts_with("invalid escape") {
            debug!(error = %err, "JSON error is not an escape problem");
            break;
        }

        match find_escape_backslash(&current, err.line(), err.column()) {
            Some(pos) => {
                debug!(attempt, pos, "Repairing invalid escape");
                current.insert(pos, '\\');
            }
            None => break,
        }
    }

    current
}

/// Byte offset of the backslash that starts the escape serde_json rejected.
///
/// serde_json reports the line (1-based) and a column just past the rejected
/// escape character, so the backslash normally sits two bytes before that
/// point. If it does not, search a few bytes back for the nearest backslash
/// that really opens an invalid escape.
fn find_escape_backslash(text: &str, line: usize, column: usize) -> Option<usize> {
    let line_start = if line <= 1 {
        0
    } else {
        text.match_indices('\n').nth(line - 2).map(|(i, _)| i + 1)?
    };

    let bytes = text.as_bytes();
    let reported = (line_start + column).min(bytes.len());

    if let Some(pos) = reported.checked_sub(2) {
        if pos >= line_start && opens_invalid_escape(bytes, pos) {
            return Some(pos);
        }
    }

    let window_start = reported.saturating_sub(6).max(line_start);
    (window_start..reported)
        .rev()
        .find(|&i| opens_invalid_escape(bytes, i))
}

/// True when the byte at `i` is a backslash that starts an escape (an even
/// run of backslashes precedes it) and the escape is not valid JSON.
fn opens_invalid_escape(bytes: &[u8], i: usize) -> bool {
    if bytes.get(i) != Some(&b'\\') {
        return false;
    }
    let preceding = bytes[..i].iter().rev().take_while(|&&b| b == b'\\').count();
    preceding % 2 == 0 && !is_valid_escape_at(bytes, i)
}

fn is_valid_escape_at(bytes: &[u8], backslash: usize) -> bool {
    match bytes.get(backslash + 1) {
        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => true,
        Some(b'u') => bytes
            .get(backslash + 2..backslash + 6)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)),
        _ => false,
    }
}

/// Clean, parse, and if needed repair LLM output into `T`.
pub fn parse_llm_json<T: DeserializeOwned>(raw: &str) -> Result<T, JsonRepairError> {
    if raw.trim().is_empty() {
        return Err(JsonRepairError::Invalid {
            message: "empty AI response".to_string(),
            raw_preview: String::new(),
        });
    }

    let cleaned = clean_json_text(raw);
    if let Ok(value) = serde_json::from_str::<T>(&cleaned) {
        return Ok(value);
    }

    let repaired = repair_invalid_escapes(&cleaned, MAX_REPAIR_ATTEMPTS);
    serde_json::from_str::<T>(&repaired).map_err(|e| JsonRepairError::Invalid {
        message: e.to_string(),
        raw_preview: raw.chars().take(RAW_PREVIEW_CHARS).collect(),
    })
}
