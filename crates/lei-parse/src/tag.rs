//! Tag-driven HTML parser.
//!
//! Works on sources with reliable markup: each `<p>`/`<h3>`/`<h4>` is one
//! logical block, and epigraphs are recognizable as fully-bold blocks. The
//! classifier regexes do the rest.

use std::sync::LazyLock;

use lei_core::structure::ParsedLaw;
use log::debug;
use scraper::{Html, Selector};

use crate::assembler::Assembler;
use crate::classify::{classify_line, collapse_whitespace, LineClass};
use crate::error::{ParseError, Result};
use crate::fixups::{fix_double_encoding, normalize_ordinals};

static BLOCK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p, h3, h4").unwrap());
static BOLD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("b, strong").unwrap());

/// Parse `html` into the intermediate law using block tags and bold spans.
pub fn parse_tag_html(html: &str, base_urn: &str) -> Result<ParsedLaw> {
    let html = fix_double_encoding(html);
    let html = normalize_ordinals(&html);
    let mentions_parte_geral = html.to_lowercase().contains("parte geral");

    let document = Html::parse_document(&html);
    let mut assembler = Assembler::new(base_urn, mentions_parte_geral);

    for block in document.select(&BLOCK_SEL) {
        let text = collapse_whitespace(&block.text().collect::<String>());
        if text.is_empty() {
            continue;
        }

        let class = classify_line(&text);
        if let LineClass::Hierarchy { level, heading } = class {
            assembler.on_hierarchy(level, heading);
            continue;
        }

        // Bold-span inspection: a block whose bold spans cover the whole
        // non-annotation content is an epigraph, unless it reads like an
        // article header.
        let bold = collapse_whitespace(&bold_text(&block));
        if !bold.is_empty() && !text.starts_with("Art") {
            let clean = lei_core::annotation::split_annotations(&text).clean;
            if bold == clean {
                debug!("epigraph: {text}");
                assembler.on_epigraph(clean);
                continue;
            }
        }

        dispatch(&mut assembler, class);
    }

    if assembler.article_count() == 0 {
        return Err(ParseError::NoArticles);
    }
    Ok(assembler.finish())
}

fn bold_text(block: &scraper::ElementRef<'_>) -> String {
    block
        .select(&BOLD_SEL)
        .flat_map(|b| b.text())
        .collect::<String>()
}

fn dispatch(assembler: &mut Assembler, class: LineClass) {
    match class {
        LineClass::Hierarchy { level, heading } => assembler.on_hierarchy(level, heading),
        LineClass::Article { number, text } => assembler.on_article(number, text, false),
        LineClass::Paragraph { number, text } => assembler.on_paragraph(number, text, false),
        LineClass::Inciso { number, text } => assembler.on_inciso(number, text, false),
        LineClass::Alinea { letter, text } => assembler.on_alinea(letter, text, false),
        LineClass::Item { number, text } => assembler.on_item(number, text, false),
        LineClass::Penalty { text } => assembler.on_penalty(text, false),
        LineClass::Continuation { text } => assembler.on_continuation(text),
        LineClass::Orphan { text } => assembler.on_orphan(text),
    }
}
