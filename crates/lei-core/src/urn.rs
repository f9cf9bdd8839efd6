//! URN fragment ↔ slug conversion.
//!
//! A URN addresses a sub-element through a `!`-prefixed fragment of
//! `_`-joined tokens, each `<type><number>`:
//! `urn:lex:br:federal:decreto.lei:1940-12-07;2848!art121_par2_inc4`.
//! The slug form of the same address is the dotted hierarchical
//! `artigo-121.paragrafo-2.inciso-4`.

use crate::number::slug_number;

/// Slug prefixes a converted fragment may legally start with. The first
/// token of a full fragment must map to `artigo-`; sub-fragment validation
/// accepts the continuation prefixes as well.
const CONTINUATION_PREFIXES: [&str; 10] = [
    "caput",
    "paragrafo-",
    "inciso-",
    "alinea-",
    "item-",
    "parte-",
    "livro-",
    "titulo-",
    "capitulo-",
    "secao-",
];

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Result of converting a URN fragment: the slug plus any warnings raised
/// for tokens that could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugConversion {
    pub slug: String,
    pub warnings: Vec<String>,
}

/// The fragment part of a URN — everything after the `!` separator.
pub fn fragment_of(urn: &str) -> Option<&str> {
    urn.split_once('!').map(|(_, frag)| frag)
}

/// Convert a URN fragment (`art121_par2_inc4`) to its slug
/// (`artigo-121.paragrafo-2.inciso-4`).
///
/// Unknown type tokens pass through unchanged and flag a warning rather
/// than failing the conversion.
pub fn fragment_to_slug(fragment: &str) -> SlugConversion {
    let mut parts = Vec::new();
    let mut warnings = Vec::new();

    for token in fragment.split('_').filter(|t| !t.is_empty()) {
        let split = token
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map_or(token.len(), |(i, _)| i);
        let (kind, number) = token.split_at(split);

        let slug_kind = match kind {
            "art" => "artigo",
            "par" => "paragrafo",
            "inc" => "inciso",
            "ali" => "alinea",
            "ite" => "item",
            "cpt" => "caput",
            "prt" => "parte",
            "liv" => "livro",
            "tit" => "titulo",
            "cap" => "capitulo",
            "sec" => "secao",
            _ => {
                warnings.push(format!("unknown fragment token: {token}"));
                parts.push(token.to_string());
                continue;
            }
        };

        if slug_kind == "caput" {
            parts.push("caput".to_string());
            continue;
        }

        let number = normalize_token_number(slug_kind, number);
        parts.push(format!("{slug_kind}-{number}"));
    }

    SlugConversion {
        slug: parts.join("."),
        warnings,
    }
}

/// Token numbers are lowercased with suffix letters preserved
/// (`121a` → `121a`); the LexML sole-paragraph forms `1u`/`u` become
/// `unico`.
fn normalize_token_number(slug_kind: &str, number: &str) -> String {
    let number = slug_number(number);
    if slug_kind == "paragrafo" && (number == "1u" || number == "u" || number == "unico") {
        "unico".to_string()
    } else {
        number
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A full element slug must start at an article.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.starts_with("artigo-")
}

/// A sub-fragment slug (validated on its own) may start at any permitted
/// continuation level.
pub fn is_valid_continuation(slug: &str) -> bool {
    is_valid_slug(slug)
        || CONTINUATION_PREFIXES
            .iter()
            .any(|p| slug.starts_with(p))
}

/// Normalize a slug for URN↔slug comparison: the `-revogado` vigency shift
/// is an emit-side marker with no URN counterpart.
pub fn strip_revocation_shift(slug: &str) -> String {
    slug.replace("-revogado", "")
}
