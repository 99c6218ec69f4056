//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Decode an HTML body to text
///
/// The charset comes from the `Content-Type` header when it names one,
/// then from a `<meta charset>` near the top of the document, and falls
/// back to UTF-8. Malformed sequences become U+FFFD; decoding never fails.
pub fn decode_html<'a>(bytes: &'a [u8], content_type: Option<&str>) -> Cow<'a, str> {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(UTF_8);

    let (text, _encoding, _had_errors) = encoding.decode(bytes);
    text
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    static META_CHARSET_RE: OnceLock<Regex> = OnceLock::new();

    let re = META_CHARSET_RE.get_or_init(|| {
        Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_\-]+)"#)
            .expect("Invalid regex pattern")
    });

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let caps = re.captures(&head)?;
    Encoding::for_label(caps.get(1)?.as_str().as_bytes())
}

/// Normalize whitespace in text, including non-breaking spaces
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    // `\s` is Unicode-aware and covers U+00A0
    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

    re.replace_all(text.trim(), " ").to_string()
}

/// Whether `text` is a non-empty run of ASCII digits
pub fn is_ascii_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
