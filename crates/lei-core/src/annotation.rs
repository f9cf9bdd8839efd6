//! Trailing editorial-annotation splitting.
//!
//! Legislative sources append parenthesized editorial clauses to body text:
//! `"Matar alguém: (Redação dada pela Lei nº 12.015, de 2009)"`. The
//! splitter strips the trailing run of such clauses so search text and
//! `texto_plano` stay clean, while the original text and the annotation
//! list survive on the plate block.

use std::sync::LazyLock;

use regex::Regex;

/// A parenthesized clause counts as an editorial annotation when its content
/// starts with one of the legislative-action markers, accent- and
/// case-insensitively, optionally followed by `pel[ao] …`.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\(\s*(inclu[ií]d[oa]s?|revogad[oa]s?|acrescid[oa]s?|alterad[oa]s?|vetad[oa]s?|suprimid\w*|renumerad[oa]s?|reda[çc][ãa]o\s+dada|vide|vig[êe]ncia)\b",
    )
    .unwrap()
});

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Outcome of splitting a body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitText {
    /// Body with the trailing annotation run removed.
    pub clean: String,
    /// The input, trimmed but otherwise untouched.
    pub original: String,
    /// Split-off annotations in source order.
    pub annotations: Vec<String>,
}

/// Strip the trailing run of annotation clauses from `text`.
///
/// Only *trailing* parentheses are considered, peeled one at a time from the
/// end; the first non-annotation parenthesis stops the run, so a body that
/// legitimately ends with `(dois)` keeps it.
pub fn split_annotations(text: &str) -> SplitText {
    let original = text.trim().to_string();
    let mut clean: &str = &original;
    let mut annotations: Vec<String> = Vec::new();

    loop {
        let t = clean.trim_end();
        clean = t;
        if !t.ends_with(')') {
            break;
        }
        let Some(open) = t.rfind('(') else {
            break;
        };
        let candidate = &t[open..];
        if !MARKER_RE.is_match(candidate) {
            break;
        }
        annotations.push(candidate.to_string());
        clean = &t[..open];
    }

    annotations.reverse();
    SplitText {
        clean: clean.trim().to_string(),
        original,
        annotations,
    }
}

// ---------------------------------------------------------------------------
// Status inference
// ---------------------------------------------------------------------------

/// Vigency verdict inferred from an annotation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotatedStatus {
    Valid,
    Revoked,
    Vetoed,
}

/// Infer the vigency verdict carried by `annotations`.
///
/// `revogad` wins over everything; `vetad` only counts when no `mantid`
/// follows it (a maintained veto was overridden by Congress and the text is
/// in force).
pub fn infer_status(annotations: &[String]) -> AnnotatedStatus {
    let joined = annotations.join(" ").to_lowercase();
    if joined.contains("revogad") {
        AnnotatedStatus::Revoked
    } else if joined.contains("vetad") && !joined.contains("mantid") {
        AnnotatedStatus::Vetoed
    } else {
        AnnotatedStatus::Valid
    }
}

/// `true` when `clean` holds no content beyond punctuation.
pub fn is_effectively_empty(clean: &str) -> bool {
    !clean.chars().any(char::is_alphanumeric)
}

/// Revocation detected purely from a trailing `(Revogado…)` annotation:
/// nothing but punctuation remains once the annotation run is stripped.
pub fn is_textually_revoked(text: &str) -> bool {
    let split = split_annotations(text);
    is_effectively_empty(&split.clean) && infer_status(&split.annotations) == AnnotatedStatus::Revoked
}
