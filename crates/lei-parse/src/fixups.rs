//! Source-text corrections applied before classification.
//!
//! Legacy sources arrive with two distinct defects: double-encoded UTF-8
//! (`Ã§` where `ç` was meant) and U+FFFD replacement characters left by a
//! lossy conversion upstream (`CAP�TULO`). Both are fixed textually so the
//! classifier regexes see clean Portuguese.

use std::sync::LazyLock;

use regex::Regex;

static ART_BARE_ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(Art\.?\s*\d+)[o°]([^\w]|$)").unwrap());
static PAR_BARE_ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(§\s*\d+)[o°]([^\w]|$)").unwrap());

/// Known U+FFFD casualties in hierarchy keywords and their repairs.
const MOJIBAKE_TABLE: [(&str, &str); 12] = [
    ("CAP\u{FFFD}TULO", "CAPÍTULO"),
    ("T\u{FFFD}TULO", "TÍTULO"),
    ("SE\u{FFFD}\u{FFFD}O", "SEÇÃO"),
    ("SEC\u{FFFD}O", "SEÇÃO"),
    ("SE\u{FFFD}AO", "SEÇÃO"),
    ("PAR\u{FFFD}GRAFO", "PARÁGRAFO"),
    ("Par\u{FFFD}grafo", "Parágrafo"),
    ("par\u{FFFD}grafo", "parágrafo"),
    ("\u{FFFD}NICO", "ÚNICO"),
    ("\u{FFFD}nico", "único"),
    ("Se\u{FFFD}\u{FFFD}o", "Seção"),
    ("Subse\u{FFFD}\u{FFFD}o", "Subseção"),
];

/// Repair text that was decoded as latin-1/cp1252 when it was really UTF-8.
///
/// Detection is the `Ã`/`Â` lead-byte signature; the repair re-encodes the
/// text as cp1252 bytes and re-decodes the whole thing as UTF-8. On any
/// failure the input is returned unchanged.
pub fn fix_double_encoding(text: &str) -> String {
    if !text.contains('Ã') && !text.contains('Â') {
        return text.to_string();
    }
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    if had_errors {
        return text.to_string();
    }
    match String::from_utf8(bytes.into_owned()) {
        Ok(fixed) => fixed,
        Err(_) => text.to_string(),
    }
}

/// Normalize ordinal glyphs: `Art. 1o` / `Art. 1°` → `Art. 1º`, same for
/// paragraph signs.
pub fn normalize_ordinals(text: &str) -> String {
    let text = ART_BARE_ORDINAL_RE.replace_all(text, "${1}º${2}");
    PAR_BARE_ORDINAL_RE.replace_all(&text, "${1}º${2}").into_owned()
}

/// Apply the U+FFFD repair table.
pub fn fix_mojibake(text: &str) -> String {
    if !text.contains('\u{FFFD}') {
        return text.to_string();
    }
    let mut out = text.to_string();
    for (broken, fixed) in MOJIBAKE_TABLE {
        out = out.replace(broken, fixed);
    }
    out
}
