// scrub-core/src/headless.rs
//! Convenience wrappers for using the engine in headless mode (non-UI).
//! Provides helpers for decoding raw input and running a full, one-shot
//! redaction pass.

use encoding_rs::{DecoderResult, Encoding, UTF_8, WINDOWS_1252};
use log::{debug, info};
use std::fmt;

use crate::config::RedactionConfig;
use crate::engine::SanitizationEngine;
use crate::engines::regex_engine::RegexEngine;
use crate::errors::ScrubError;
use crate::redaction_match::MatchReport;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How raw input bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputEncoding {
    /// Strict UTF-8. A leading byte-order mark is dropped.
    #[default]
    Utf8,
    /// Byte-order mark if present, else UTF-8 if valid, else windows-1252.
    Auto,
    /// A fixed WHATWG encoding, decoded strictly.
    Label(&'static Encoding),
}

impl InputEncoding {
    /// Parses `auto` or any WHATWG encoding label (`latin1`, `utf-16le`, `shift_jis`, ...).
    pub fn from_label(label: &str) -> Result<Self, ScrubError> {
        if label.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) if encoding == UTF_8 => Ok(Self::Utf8),
            Some(encoding) => Ok(Self::Label(encoding)),
            None => Err(ScrubError::UnknownEncoding(label.to_string())),
        }
    }
}

impl fmt::Display for InputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Utf8 => f.write_str(UTF_8.name()),
            Self::Auto => f.write_str("auto"),
            Self::Label(encoding) => f.write_str(encoding.name()),
        }
    }
}

/// Decodes raw input as UTF-8, dropping a leading byte-order mark.
///
/// # Arguments
///
/// * `bytes` - The complete input, as read from its source.
/// * `source_id` - A stable identifier for the input (file path or `<stdin>`), used in errors.
pub fn decode_input(bytes: Vec<u8>, source_id: &str) -> Result<String, ScrubError> {
    let bytes = if bytes.starts_with(UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    };
    String::from_utf8(bytes).map_err(|e| ScrubError::Encoding {
        source_id: source_id.to_string(),
        encoding: UTF_8.name(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// Decodes raw input with the selected encoding.
///
/// Error offsets count bytes after any byte-order mark.
pub fn decode_input_as(
    bytes: Vec<u8>,
    source_id: &str,
    encoding: InputEncoding,
) -> Result<String, ScrubError> {
    match encoding {
        InputEncoding::Utf8 => decode_input(bytes, source_id),
        InputEncoding::Label(encoding) => {
            let body = match Encoding::for_bom(&bytes) {
                Some((found, bom_len)) if found == encoding => &bytes[bom_len..],
                _ => &bytes[..],
            };
            decode_strict(body, encoding, source_id)
        }
        InputEncoding::Auto => {
            if let Some((found, bom_len)) = Encoding::for_bom(&bytes) {
                debug!("Byte-order mark in '{}' selects {}.", source_id, found.name());
                return decode_strict(&bytes[bom_len..], found, source_id);
            }
            match String::from_utf8(bytes) {
                Ok(text) => Ok(text),
                Err(e) => {
                    info!(
                        "Input from '{}' is not UTF-8; decoding as {}.",
                        source_id,
                        WINDOWS_1252.name()
                    );
                    decode_strict(&e.into_bytes(), WINDOWS_1252, source_id)
                }
            }
        }
    }
}

/// Decodes without replacement characters; the first malformed sequence is an error.
fn decode_strict(
    bytes: &[u8],
    encoding: &'static Encoding,
    source_id: &str,
) -> Result<String, ScrubError> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut text = String::with_capacity(bytes.len());
    let mut consumed = 0usize;

    loop {
        let remaining = &bytes[consumed..];
        let (result, read) = decoder.decode_to_string_without_replacement(remaining, &mut text, true);
        consumed += read;
        match result {
            DecoderResult::InputEmpty => return Ok(text),
            DecoderResult::OutputFull => {
                let left = bytes.len() - consumed;
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(left)
                    .unwrap_or(left + 4);
                text.reserve(needed.max(4));
            }
            DecoderResult::Malformed(bad, after) => {
                return Err(ScrubError::Encoding {
                    source_id: source_id.to_string(),
                    encoding: encoding.name(),
                    offset: consumed - usize::from(after) - usize::from(bad),
                });
            }
        }
    }
}

/// Decodes, compiles and applies in one call.
///
/// Rules are compiled before the input is decoded, so an invalid rule is
/// reported even when the input is also malformed.
pub fn headless_scrub_bytes(
    config: &RedactionConfig,
    bytes: Vec<u8>,
    source_id: &str,
) -> Result<(String, MatchReport), ScrubError> {
    let engine = RegexEngine::new(config)?;
    let text = decode_input(bytes, source_id)?;
    Ok(engine.sanitize(&text))
}
