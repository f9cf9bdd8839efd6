//! Charset ladder for fetched HTML.
//!
//! Sources serve a mix of UTF-8 and legacy single-byte encodings, often
//! without a truthful `Content-Type`. Bytes are tried as UTF-8 first, then
//! latin-1, then cp1252.

use crate::error::{FetchError, Result};

/// Decode `bytes` trying utf-8 → latin-1 → cp1252, strictly.
///
/// Latin-1 can represent any byte, so it is only accepted when the input
/// avoids the 0x80–0x9F gap; bytes in that gap are meaningful in cp1252
/// (smart quotes, ordinal glyph artifacts) and garbage in latin-1.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }

    let has_c1_gap = bytes.iter().any(|b| (0x80..=0x9F).contains(b));
    if !has_c1_gap {
        return Ok(bytes.iter().map(|&b| b as char).collect());
    }

    encoding_rs::WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|s| s.into_owned())
        .ok_or(FetchError::Decode)
}
