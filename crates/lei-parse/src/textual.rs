//! Text-driven HTML parser.
//!
//! For sources whose markup is too sparse for bold-span detection (the
//! Planalto presentation): strike-through regions become sentinel markers,
//! the raw markup is re-blocked into logical paragraphs tagged with
//! `(text, struck, centered)`, and a line-level state machine applies the
//! hierarchy, continuation, and revocation heuristics.

use std::sync::LazyLock;

use lei_core::structure::ParsedLaw;
use log::{debug, warn};
use regex::Regex;

use crate::assembler::Assembler;
use crate::classify::{
    classify_line, collapse_whitespace, starts_punctuation, LineClass, HEADER_ANCHOR_RE,
};
use crate::error::{ParseError, Result};
use crate::fixups::{fix_double_encoding, fix_mojibake, normalize_ordinals};

/// Sentinels standing in for strike-through region boundaries once tags are
/// stripped. Private-use codepoints cannot occur in legitimate source text.
const STRIKE_OPEN: char = '\u{E000}';
const STRIKE_CLOSE: char = '\u{E001}';

static STRIKE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*(?:s|strike|del)\b[^>]*>").unwrap());
static STRIKE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*/\s*(?:s|strike|del)\s*>").unwrap());
static BLOCK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*(/?)\s*(p|div|center|h[1-6])\b[^>]*>").unwrap());
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// One logical paragraph of the re-blocked source.
#[derive(Debug, Clone)]
struct Block {
    text: String,
    struck: bool,
    centered: bool,
}

/// Parse `html` into the intermediate law using line-block heuristics.
pub fn parse_text_html(html: &str, base_urn: &str) -> Result<ParsedLaw> {
    let html = fix_double_encoding(html);
    let html = normalize_ordinals(&html);
    let mentions_parte_geral = html.to_lowercase().contains("parte geral");

    let mut blocks = reblock(&html);
    strip_trailing_index(&mut blocks);

    let mut assembler = Assembler::new(base_urn, mentions_parte_geral);
    let mut warned_leading_orphan = false;

    for block in &blocks {
        for segment in segment_labels(&block.text) {
            consume(
                &mut assembler,
                &segment,
                block,
                &mut warned_leading_orphan,
            );
        }
    }

    if assembler.article_count() == 0 {
        return Err(ParseError::NoArticles);
    }
    Ok(assembler.finish())
}

// ---------------------------------------------------------------------------
// Re-blocking
// ---------------------------------------------------------------------------

/// Split raw markup into logical blocks at `<p>/<div>/<center>/<h*>`
/// boundaries, tracking centering and strike-through along the way. Falls
/// back to blank-line splitting when the source has no block tags at all.
fn reblock(html: &str) -> Vec<Block> {
    let html = STRIKE_OPEN_RE
        .replace_all(html, STRIKE_OPEN.to_string())
        .into_owned();
    let html = STRIKE_CLOSE_RE
        .replace_all(&html, STRIKE_CLOSE.to_string())
        .into_owned();

    let boundaries: Vec<(usize, usize, bool, String, String)> = BLOCK_TAG_RE
        .captures_iter(&html)
        .map(|caps| {
            let m = caps.get(0).unwrap();
            (
                m.start(),
                m.end(),
                !caps[1].is_empty(),
                caps[2].to_lowercase(),
                m.as_str().to_lowercase(),
            )
        })
        .collect();

    if boundaries.is_empty() {
        return reblock_blank_lines(&html);
    }

    let mut blocks = Vec::new();
    let mut strike_depth: i32 = 0;
    let mut center_depth: i32 = 0;
    let mut segment_start = 0usize;
    let mut owner_tag = String::new();

    // Closing sentinel so the tail after the last tag is flushed too.
    let tail = (html.len(), html.len(), true, String::new(), String::new());
    for (start, end, is_close, name, raw) in boundaries.iter().chain(std::iter::once(&tail)) {
        let segment = &html[segment_start..*start];
        push_segment(segment, &owner_tag, center_depth, &mut strike_depth, &mut blocks);

        if name.as_str() == "center" {
            center_depth += if *is_close { -1 } else { 1 };
            center_depth = center_depth.max(0);
        }
        owner_tag = if *is_close { String::new() } else { raw.clone() };
        segment_start = *end;
    }

    blocks
}

fn push_segment(
    segment: &str,
    owner_tag: &str,
    center_depth: i32,
    strike_depth: &mut i32,
    blocks: &mut Vec<Block>,
) {
    let stripped = ANY_TAG_RE.replace_all(segment, " ");
    let decoded = html_escape::decode_html_entities(stripped.as_ref()).into_owned();

    let visible: String = decoded
        .chars()
        .filter(|c| *c != STRIKE_OPEN && *c != STRIKE_CLOSE)
        .collect();
    let struck = segment_is_struck(&decoded, *strike_depth);

    for c in decoded.chars() {
        match c {
            STRIKE_OPEN => *strike_depth += 1,
            STRIKE_CLOSE => *strike_depth = (*strike_depth - 1).max(0),
            _ => {}
        }
    }

    let text = collapse_whitespace(&fix_mojibake(&visible));
    if text.is_empty() {
        return;
    }
    blocks.push(Block {
        text,
        struck,
        centered: center_depth > 0 || owner_tag.contains("center"),
    });
}

/// A segment counts as struck when every non-whitespace character sits
/// inside a strike region.
fn segment_is_struck(decoded: &str, mut depth: i32) -> bool {
    let mut any_visible = false;
    for c in decoded.chars() {
        match c {
            STRIKE_OPEN => depth += 1,
            STRIKE_CLOSE => depth = (depth - 1).max(0),
            c if c.is_whitespace() => {}
            _ => {
                any_visible = true;
                if depth == 0 {
                    return false;
                }
            }
        }
    }
    any_visible
}

fn reblock_blank_lines(html: &str) -> Vec<Block> {
    let stripped = ANY_TAG_RE.replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(stripped.as_ref()).into_owned();
    let mut strike_depth = 0i32;
    let mut blocks = Vec::new();
    for chunk in decoded.split("\n\n") {
        push_segment(chunk, "", 0, &mut strike_depth, &mut blocks);
    }
    blocks
}

/// Drop the trailing table-of-contents some sources append after the body.
fn strip_trailing_index(blocks: &mut Vec<Block>) {
    let cut = blocks
        .iter()
        .rposition(|b| {
            let t = b.text.trim();
            t == "ÍNDICE" || t == "INDICE"
        })
        .filter(|i| *i >= blocks.len() / 2);
    if let Some(i) = cut {
        debug!("dropping trailing index at block {i}");
        blocks.truncate(i);
    }
}

// ---------------------------------------------------------------------------
// Multi-label segmentation
// ---------------------------------------------------------------------------

/// Split a block holding several concatenated headings (`TÍTULO I CAPÍTULO
/// I DOS CRIMES…`) at each heading anchor. Blocks without a leading anchor
/// pass through whole.
fn segment_labels(text: &str) -> Vec<String> {
    let starts: Vec<usize> = HEADER_ANCHOR_RE.find_iter(text).map(|m| m.start()).collect();
    if starts.len() < 2 || starts[0] != 0 {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let piece = text[*start..end].trim();
        if !piece.is_empty() {
            segments.push(piece.to_string());
        }
    }
    segments
}

// ---------------------------------------------------------------------------
// Line consumption
// ---------------------------------------------------------------------------

fn consume(
    assembler: &mut Assembler,
    text: &str,
    block: &Block,
    warned_leading_orphan: &mut bool,
) {
    let struck = block.struck;
    match classify_line(text) {
        LineClass::Hierarchy { level, heading } => assembler.on_hierarchy(level, heading),
        LineClass::Article { number, text } => assembler.on_article(number, text, struck),
        LineClass::Paragraph { number, text } => assembler.on_paragraph(number, text, struck),
        LineClass::Inciso { number, text } => assembler.on_inciso(number, text, struck),
        LineClass::Alinea { letter, text } => assembler.on_alinea(letter, text, struck),
        LineClass::Item { number, text } => assembler.on_item(number, text, struck),
        LineClass::Penalty { text } => assembler.on_penalty(text, struck),
        LineClass::Continuation { text } => {
            if is_continuation(assembler, &text, block) {
                assembler.on_continuation(text);
            } else {
                assembler.on_orphan(text);
            }
        }
        LineClass::Orphan { text } => {
            if starts_punctuation(&text) && is_continuation(assembler, &text, block) {
                assembler.on_continuation(text);
            } else {
                if assembler.article_count() == 0
                    && !block.centered
                    && !assembler.header_pending()
                    && !*warned_leading_orphan
                {
                    // Without a centering signal the first free-standing line
                    // is ambiguous; surface it instead of reclassifying.
                    warn!("unanchored leading text kept as orphan: {text}");
                    *warned_leading_orphan = true;
                }
                assembler.on_orphan(text);
            }
        }
    }
}

/// Continuation heuristic: not centered, and either the previous body is
/// still mid-sentence or the line is a parenthesized annotation.
fn is_continuation(assembler: &mut Assembler, text: &str, block: &Block) -> bool {
    if block.centered {
        return false;
    }
    if assembler.header_pending() {
        // The waiting header claims the line as its description.
        return false;
    }
    let terminal = matches!(
        assembler.last_body_char(),
        Some('.') | Some(':') | Some(';') | Some('!') | Some('?')
    );
    let annotation = text.starts_with('(') && text.ends_with(')');
    !terminal || annotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use lei_core::element::{ElementKind, HierarchyLevel};

    const URN: &str = "urn:lex:br:federal:decreto.lei:1940-12-07;2848";

    #[test]
    fn reblocks_paragraph_tags() {
        let blocks = reblock("<p>Art. 1º Texto.</p><p align=\"center\">TÍTULO I</p>");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Art. 1º Texto.");
        assert!(!blocks[0].centered);
        assert!(blocks[1].centered);
    }

    #[test]
    fn center_element_marks_blocks() {
        let blocks = reblock("<center><p>CAPÍTULO I</p></center><p>Art. 1º X.</p>");
        assert!(blocks[0].centered);
        assert!(!blocks[1].centered);
    }

    #[test]
    fn strike_region_marks_block_struck() {
        let blocks = reblock("<p><s>Art. 240. Adultério.</s></p><p>Art. 241. Texto.</p>");
        assert!(blocks[0].struck);
        assert!(!blocks[1].struck);
    }

    #[test]
    fn strike_spanning_blocks_carries_depth() {
        let blocks = reblock("<s><p>Art. 240. Adultério.</p><p>Pena - detenção.</p></s><p>Art. 241. X.</p>");
        assert!(blocks[0].struck);
        assert!(blocks[1].struck);
        assert!(!blocks[2].struck);
    }

    #[test]
    fn partially_struck_block_is_not_struck() {
        let blocks = reblock("<p>Texto vigente <s>trecho riscado</s></p>");
        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].struck);
    }

    #[test]
    fn blank_line_fallback_when_no_tags() {
        let blocks = reblock("Art. 1º Texto.\n\nArt. 2º Outro.");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn entities_are_decoded() {
        let blocks = reblock("<p>Art. 1&ordm;&nbsp;Texto &amp; mais.</p>");
        assert_eq!(blocks[0].text, "Art. 1º Texto & mais.");
    }

    #[test]
    fn full_pipeline_builds_hierarchy_and_articles() {
        let html = r#"
            <p align="center">PARTE GERAL</p>
            <p align="center">TÍTULO I</p>
            <p align="center">DA APLICAÇÃO DA LEI PENAL</p>
            <p>Art. 1º Não há crime sem lei anterior que o defina.</p>
            <p>Parágrafo único. Texto do parágrafo.</p>
            <p>Art. 2º Ninguém pode ser punido por fato</p>
            <p>que lei posterior deixa de considerar crime.</p>
        "#;
        let parsed = parse_text_html(html, URN).unwrap();

        assert_eq!(parsed.structure.flat.partes, vec!["PARTE GERAL"]);
        assert_eq!(
            parsed.structure.flat.titulos,
            vec!["TÍTULO I - DA APLICAÇÃO DA LEI PENAL"]
        );
        assert_eq!(parsed.articles.len(), 2);
        let par = &parsed.articles[0].children[0];
        assert_eq!(par.number, "unico");
        // The lowercase line joined article 2's caput.
        assert_eq!(
            parsed.articles[1].text,
            "Ninguém pode ser punido por fato que lei posterior deixa de considerar crime."
        );
    }

    #[test]
    fn struck_article_collects_struck_penalty() {
        let html = r#"
            <p>Art. 239. Texto vigente.</p>
            <p><s>Art. 240. Adultério.</s></p>
            <p><s>Pena - detenção, de quinze dias a seis meses.</s></p>
            <p>Art. 241. Registrar como seu o filho de outrem.</p>
        "#;
        let parsed = parse_text_html(html, URN).unwrap();
        assert_eq!(parsed.articles.len(), 3);

        let revoked = &parsed.articles[1];
        assert!(revoked.textually_revoked);
        assert!(!revoked.in_force);
        assert_eq!(revoked.children[0].kind, ElementKind::Penalty);
        assert!(revoked.children[0].textually_revoked);
        assert!(parsed.articles[2].in_force);
    }

    #[test]
    fn multi_label_block_is_segmented() {
        let html = r#"
            <p>TÍTULO II CAPÍTULO I</p>
            <p>Art. 5º Texto.</p>
        "#;
        let parsed = parse_text_html(html, URN).unwrap();
        assert_eq!(parsed.structure.flat.titulos, vec!["TÍTULO II"]);
        assert_eq!(parsed.structure.flat.capitulos, vec!["CAPÍTULO I"]);
        assert_eq!(
            parsed.articles[0].path[&HierarchyLevel::Capitulo],
            "CAPÍTULO I"
        );
    }

    #[test]
    fn trailing_index_is_dropped() {
        let html = r#"
            <p>Art. 1º Texto.</p>
            <p>Art. 2º Outro texto aqui presente.</p>
            <p>ÍNDICE</p>
            <p>TÍTULO I</p>
        "#;
        let parsed = parse_text_html(html, URN).unwrap();
        assert_eq!(parsed.articles.len(), 2);
        assert!(parsed.structure.flat.titulos.is_empty());
    }

    #[test]
    fn annotation_line_continues_previous_element() {
        let html = r#"
            <p>Art. 128. Não se pune o aborto praticado por médico:</p>
            <p>(Vide ADPF 54)</p>
        "#;
        let parsed = parse_text_html(html, URN).unwrap();
        assert!(parsed.articles[0].text.contains("(Vide ADPF 54)"));
    }

    #[test]
    fn centered_uppercase_is_description_not_continuation() {
        let html = r#"
            <p align="center">CAPÍTULO I</p>
            <p align="center">DOS CRIMES CONTRA A VIDA</p>
            <p>Art. 121. Matar alguém:</p>
        "#;
        let parsed = parse_text_html(html, URN).unwrap();
        assert_eq!(
            parsed.structure.flat.capitulos,
            vec!["CAPÍTULO I - DOS CRIMES CONTRA A VIDA"]
        );
    }

    #[test]
    fn zero_articles_is_an_error() {
        assert!(matches!(
            parse_text_html("<p>Nada.</p>", URN),
            Err(ParseError::NoArticles)
        ));
    }

    #[test]
    fn mojibake_header_is_repaired() {
        let html = "<p>CAP\u{FFFD}TULO I</p><p>Art. 1\u{BA} Texto.</p>";
        let parsed = parse_text_html(html, URN).unwrap();
        assert_eq!(parsed.structure.flat.capitulos, vec!["CAPÍTULO I"]);
    }
}
