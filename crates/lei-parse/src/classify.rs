//! Per-line structural classification shared by both HTML parsers.
//!
//! Each logical block of the source is mapped to a [`LineClass`] using
//! prefix regexes, ordered from the most to the least specific. The two
//! parsers layer their own signals (bold spans, centering, strike-through)
//! on top of this.

use std::sync::LazyLock;

use lei_core::element::HierarchyLevel;
use regex::Regex;

// ---------------------------------------------------------------------------
// Regexes
// ---------------------------------------------------------------------------

const NUMERAL: &str = r"[IVXLCDM]+(?:-[A-Z])?|[ÚU]NIC[OA]|GERAL|ESPECIAL|\d+";

static PARTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*PARTE\s+({NUMERAL})\b(.*)$")).unwrap());
static LIVRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*LIVRO\s+({NUMERAL})\b(.*)$")).unwrap());
static TITULO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*T[ÍI]TULO\s+({NUMERAL})\b(.*)$")).unwrap());
static SUBTITULO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*SUBT[ÍI]TULO\s+({NUMERAL})\b(.*)$")).unwrap());
static CAPITULO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*CAP[ÍI]TULO\s+({NUMERAL})\b(.*)$")).unwrap());
// Seção/Subseção headers are printed in title case by some sources, so the
// keyword is case-tolerant; the mandatory numeral keeps prose from matching.
static SECAO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*(?:SE[ÇC][ÃA]O|Se[çc][ãa]o)\s+({NUMERAL})\b(.*)$")).unwrap());
static SUBSECAO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*(?:SUBSE[ÇC][ÃA]O|Subse[çc][ãa]o)\s+({NUMERAL})\b(.*)$")).unwrap()
});

static ART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*Art\.?\s*(\d+(?:\.\d+)*)\s*[ºo°]?\s*(?:-\s*([A-Z]))?\s*[.,;:–—-]?\s*(.*)$")
        .unwrap()
});
static PAR_UNICO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*par[áa]grafo\s+[úu]nico\s*[.,;:–—-]?\s*(.*)$").unwrap()
});
static PAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*§\s*(\d+)\s*[ºo°]?\s*(?:-\s*([A-Z]))?\s*[.,;:–—-]?\s*(.*)$").unwrap()
});
static INCISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([IVXLCDM]+(?:-[A-Z])?)\s*[-–—]\s*(.*)$").unwrap());
static ALINEA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([a-z])\s*\)\s*(.*)$").unwrap());
static PENA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Pena\s*[-–—]\s*(.*)$").unwrap());
static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*[.)]\s*(.*)$").unwrap());

/// Anchors of a multi-label block: several hierarchy headings glued into a
/// single line.
pub static HEADER_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:PARTE|LIVRO|T[ÍI]TULO|SUBT[ÍI]TULO|CAP[ÍI]TULO|SE[ÇC][ÃA]O|SUBSE[ÇC][ÃA]O|Se[çc][ãa]o|Subse[çc][ãa]o)\s+(?:{NUMERAL})\b"
    ))
    .unwrap()
});

// ---------------------------------------------------------------------------
// LineClass
// ---------------------------------------------------------------------------

/// Structural classification of one logical block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Hierarchy {
        level: HierarchyLevel,
        heading: String,
    },
    Article {
        number: String,
        text: String,
    },
    Paragraph {
        /// Arabic string, or `"unico"` for a sole paragraph.
        number: String,
        text: String,
    },
    Inciso {
        /// Uppercase roman numeral, optionally suffixed (`IV`, `X-A`).
        number: String,
        text: String,
    },
    Alinea {
        letter: String,
        text: String,
    },
    Item {
        number: String,
        text: String,
    },
    Penalty {
        text: String,
    },
    /// Line starting with lowercase: extends the previous textual element.
    Continuation {
        text: String,
    },
    /// Anything else.
    Orphan {
        text: String,
    },
}

/// Classify one trimmed, non-empty line.
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();

    for (re, level) in [
        (&*PARTE_RE, HierarchyLevel::Parte),
        (&*LIVRO_RE, HierarchyLevel::Livro),
        (&*TITULO_RE, HierarchyLevel::Titulo),
        (&*SUBTITULO_RE, HierarchyLevel::Subtitulo),
        (&*CAPITULO_RE, HierarchyLevel::Capitulo),
        (&*SUBSECAO_RE, HierarchyLevel::Subsecao),
        (&*SECAO_RE, HierarchyLevel::Secao),
    ] {
        if re.is_match(line) {
            return LineClass::Hierarchy {
                level,
                heading: collapse_whitespace(line),
            };
        }
    }

    if let Some((number, text)) = match_article(line) {
        return LineClass::Article { number, text };
    }

    if let Some(caps) = PAR_UNICO_RE.captures(line) {
        return LineClass::Paragraph {
            number: "unico".to_string(),
            text: caps[1].trim().to_string(),
        };
    }
    if let Some(caps) = PAR_RE.captures(line) {
        let mut number = caps[1].to_string();
        if let Some(suffix) = caps.get(2) {
            number.push('-');
            number.push_str(suffix.as_str());
        }
        return LineClass::Paragraph {
            number,
            text: caps[3].trim().to_string(),
        };
    }

    if let Some(caps) = INCISO_RE.captures(line) {
        return LineClass::Inciso {
            number: caps[1].to_string(),
            text: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = ALINEA_RE.captures(line) {
        return LineClass::Alinea {
            letter: caps[1].to_string(),
            text: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = PENA_RE.captures(line) {
        return LineClass::Penalty {
            text: caps[1].trim().to_string(),
        };
    }

    if let Some(caps) = ITEM_RE.captures(line) {
        return LineClass::Item {
            number: caps[1].to_string(),
            text: caps[2].trim().to_string(),
        };
    }

    if starts_lowercase(line) {
        return LineClass::Continuation {
            text: line.to_string(),
        };
    }

    LineClass::Orphan {
        text: line.to_string(),
    }
}

/// `true` when the line opens with a lowercase letter.
pub fn starts_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_lowercase)
}

/// `true` when the line opens with punctuation (a continuation signal for
/// the text parser, e.g. a dangling `(Vide …)` annotation).
pub fn starts_punctuation(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| !c.is_alphanumeric() && c != '§')
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Article matching
// ---------------------------------------------------------------------------

/// Match an article header, regex first, then the character scanner that
/// copes with glued ordinals (`Art. 1ºTexto`).
fn match_article(line: &str) -> Option<(String, String)> {
    if let Some(caps) = ART_RE.captures(line) {
        let mut number = caps[1].to_string();
        if let Some(suffix) = caps.get(2) {
            number.push('-');
            number.push_str(suffix.as_str());
        }
        return Some((number, caps[3].trim().to_string()));
    }
    scan_article(line)
}

/// Character-by-character article scanner.
///
/// Accepts `Art`, an optional dot, the number, an optional ordinal glyph,
/// and an optional `-X`/`X` suffix glued straight onto the following text.
fn scan_article(line: &str) -> Option<(String, String)> {
    let rest = line.trim_start().strip_prefix("Art")?;
    let rest = rest.strip_prefix('.').unwrap_or(rest).trim_start();

    let mut chars = rest.char_indices().peekable();
    let mut number = String::new();
    while let Some((_, c)) = chars.peek().copied() {
        if c.is_ascii_digit() || (c == '.' && !number.is_empty()) {
            number.push(c);
            chars.next();
        } else {
            break;
        }
    }
    let number = number.trim_end_matches('.').to_string();
    if number.is_empty() {
        return None;
    }

    // Ordinal glyph, possibly glued to the text that follows.
    if matches!(chars.peek(), Some((_, 'º' | '°' | 'o'))) {
        chars.next();
    }
    // Letter suffix: `-A`, or `A` straight after the glyph.
    let mut number = number;
    if matches!(chars.peek(), Some((_, '-'))) {
        let mut ahead = chars.clone();
        ahead.next();
        if let Some((_, c)) = ahead.peek().copied() {
            if c.is_ascii_uppercase() {
                number.push('-');
                number.push(c);
                chars = ahead;
                chars.next();
            }
        }
    }

    let text_start = chars.peek().map_or(rest.len(), |(i, _)| *i);
    let text = rest[text_start..]
        .trim_start_matches([' ', '.', ',', ';', ':', '-', '–', '—'])
        .trim()
        .to_string();
    Some((number, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(line: &str) -> (String, String) {
        match classify_line(line) {
            LineClass::Article { number, text } => (number, text),
            other => panic!("expected article, got {other:?}"),
        }
    }

    #[test]
    fn hierarchy_headers_classify_by_level() {
        assert_eq!(
            classify_line("TÍTULO I"),
            LineClass::Hierarchy {
                level: HierarchyLevel::Titulo,
                heading: "TÍTULO I".into()
            }
        );
        assert_eq!(
            classify_line("CAPÍTULO II - DAS LESÕES CORPORAIS"),
            LineClass::Hierarchy {
                level: HierarchyLevel::Capitulo,
                heading: "CAPÍTULO II - DAS LESÕES CORPORAIS".into()
            }
        );
        assert_eq!(
            classify_line("Seção II"),
            LineClass::Hierarchy {
                level: HierarchyLevel::Secao,
                heading: "Seção II".into()
            }
        );
        assert_eq!(
            classify_line("PARTE GERAL"),
            LineClass::Hierarchy {
                level: HierarchyLevel::Parte,
                heading: "PARTE GERAL".into()
            }
        );
    }

    #[test]
    fn unaccented_header_still_matches() {
        assert!(matches!(
            classify_line("TITULO IV"),
            LineClass::Hierarchy {
                level: HierarchyLevel::Titulo,
                ..
            }
        ));
    }

    #[test]
    fn hyphenated_numeral_header() {
        assert!(matches!(
            classify_line("TÍTULO II-A"),
            LineClass::Hierarchy {
                level: HierarchyLevel::Titulo,
                ..
            }
        ));
    }

    #[test]
    fn article_basic_forms() {
        assert_eq!(art("Art. 1º Não há crime sem lei."), ("1".into(), "Não há crime sem lei.".into()));
        assert_eq!(art("Art. 10. Texto."), ("10".into(), "Texto.".into()));
        assert_eq!(art("Art. 121. Matar alguém:"), ("121".into(), "Matar alguém:".into()));
        assert_eq!(art("Art. 121-A. Texto."), ("121-A".into(), "Texto.".into()));
    }

    #[test]
    fn article_with_thousands_dot() {
        assert_eq!(art("Art. 1.029. Texto."), ("1.029".into(), "Texto.".into()));
    }

    #[test]
    fn article_glued_ordinal_uses_scanner() {
        assert_eq!(art("Art. 1ºTexto glued."), ("1".into(), "Texto glued.".into()));
    }

    #[test]
    fn artigo_word_is_not_an_article() {
        assert!(matches!(classify_line("Artigo de luxo"), LineClass::Orphan { .. }));
    }

    #[test]
    fn paragraph_forms() {
        assert_eq!(
            classify_line("§ 2º No caso de..."),
            LineClass::Paragraph {
                number: "2".into(),
                text: "No caso de...".into()
            }
        );
        assert_eq!(
            classify_line("Parágrafo único. Texto."),
            LineClass::Paragraph {
                number: "unico".into(),
                text: "Texto.".into()
            }
        );
    }

    #[test]
    fn inciso_and_alinea_and_item() {
        assert_eq!(
            classify_line("IV - mediante paga ou promessa;"),
            LineClass::Inciso {
                number: "IV".into(),
                text: "mediante paga ou promessa;".into()
            }
        );
        assert_eq!(
            classify_line("b) contra ascendente;"),
            LineClass::Alinea {
                letter: "b".into(),
                text: "contra ascendente;".into()
            }
        );
        assert_eq!(
            classify_line("3. de interdição de direitos;"),
            LineClass::Item {
                number: "3".into(),
                text: "de interdição de direitos;".into()
            }
        );
    }

    #[test]
    fn penalty_line() {
        assert_eq!(
            classify_line("Pena - reclusão, de seis a vinte anos."),
            LineClass::Penalty {
                text: "reclusão, de seis a vinte anos.".into()
            }
        );
    }

    #[test]
    fn lowercase_start_is_continuation() {
        assert!(matches!(
            classify_line("sendo o agente reincidente."),
            LineClass::Continuation { .. }
        ));
    }

    #[test]
    fn uppercase_prose_is_orphan() {
        assert!(matches!(
            classify_line("O PRESIDENTE DA REPÚBLICA decreta:"),
            LineClass::Orphan { .. }
        ));
    }

    #[test]
    fn header_anchors_find_multi_label_blocks() {
        let line = "TÍTULO I DOS CRIMES CAPÍTULO I DOS CRIMES CONTRA A VIDA";
        let hits: Vec<_> = HEADER_ANCHOR_RE.find_iter(line).collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].start(), 0);
    }
}
