//! The emitter: intermediate law → output document.
//!
//! Walks each article tree producing plate blocks in reading order, builds
//! `texto_plano`/`search_text`/`content_hash`, merges revoked versions, and
//! sorts. Everything here is best-effort: after parsing succeeds, emission
//! never aborts — it counts problems instead.

use lei_core::article::{Article, LawDocument, LawInfo, LawMetadata};
use lei_core::element::{ElementKind, LawElement};
use lei_core::hash::content_hash;
use lei_core::number::sort_key;
use lei_core::structure::ParsedLaw;
use lei_core::urn::{fragment_of, fragment_to_slug, strip_revocation_shift};
use log::{debug, warn};
use uuid::Uuid;

use crate::label;
use crate::merge::merge_revoked_versions;
use crate::plate::{build_block, display_body, epigraph_block, BlockSpec};
use crate::slug;

// ---------------------------------------------------------------------------
// EmitReport
// ---------------------------------------------------------------------------

/// What emission did, for the CLI report. Mismatches are counted, never
/// fatal.
#[derive(Debug, Clone, Default)]
pub struct EmitReport {
    pub articles: usize,
    pub revoked_merged: usize,
    pub urn_slug_mismatches: usize,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Emit the parsed law as the final document.
pub fn emit(parsed: ParsedLaw, metadata: LawMetadata) -> (LawDocument, EmitReport) {
    let mut report = EmitReport::default();

    let articles: Vec<Article> = parsed
        .articles
        .iter()
        .map(|element| emit_article(element, &mut report))
        .collect();

    let (mut articles_merged, merged) = merge_revoked_versions(articles);
    report.revoked_merged = merged;

    articles_merged.sort_by_key(|a| sort_key(&a.number));
    report.articles = articles_merged.len();

    let document = LawDocument {
        lei: LawInfo {
            metadata,
            hierarquia: parsed.structure.hierarquia,
            estrutura: parsed.structure.flat,
        },
        artigos: articles_merged,
    };
    (document, report)
}

fn emit_article(element: &LawElement, report: &mut EmitReport) -> Article {
    let base = slug::article_base(&element.number, element.textually_revoked);
    let label = label::article_label(&element.number);
    debug!("emitting {base}");

    let mut out = ArticleAccumulator::default();

    if let Some(epigraph) = &element.epigraph {
        let block = epigraph_block(slug::epigraph_slug(&base), epigraph);
        out.search.push(block.search_text.clone());
        out.blocks.push(block);
    }

    // Caput.
    let caput_slug = format!("{base}.{}", slug::child_component(ElementKind::Caput, "", false));
    let caput_urn = element_urn(element).map(|u| format!("{u}_cpt"));
    out.push_body(
        report,
        BlockSpec {
            slug: caput_slug,
            urn: caput_urn,
            label: Some(label.as_str()),
            body: &element.text,
            struck: element.textually_revoked,
        },
        &element.text,
    );

    emit_children(element, &base, element.textually_revoked, &mut out, report);

    let texto_plano = out.plano.join("\n");
    Article {
        id: Uuid::new_v4(),
        number: element.number.clone(),
        slug: base,
        epigraph: element.epigraph.clone(),
        plate_content: out.blocks,
        content_hash: content_hash(&texto_plano),
        texto_plano,
        search_text: out.search.join("\n"),
        in_force: element.in_force,
        context: element.path.values().cloned().collect(),
        path: element.path.clone(),
        revoked_versions: Vec::new(),
    }
}

fn emit_children(
    parent: &LawElement,
    parent_slug: &str,
    parent_revoked: bool,
    out: &mut ArticleAccumulator,
    report: &mut EmitReport,
) {
    let mut penalty_seq = 0usize;

    for child in &parent.children {
        let shift = child.textually_revoked && !parent_revoked;
        let mut component = slug::child_component(child.kind, &child.number, shift);
        if child.kind == ElementKind::Penalty {
            penalty_seq += 1;
            if penalty_seq > 1 {
                component = format!("{component}-{penalty_seq}");
            }
        }
        let child_slug = format!("{parent_slug}.{component}");

        if let Some(rubric) = &child.epigraph {
            let block = epigraph_block(slug::rubric_slug(&child_slug), rubric);
            out.search.push(block.search_text.clone());
            out.blocks.push(block);
        }

        let child_label = match child.kind {
            ElementKind::Paragraph => label::paragraph_label(&child.number),
            ElementKind::Inciso => label::inciso_label(&child.number),
            ElementKind::Alinea => label::alinea_label(&child.number),
            ElementKind::Item => label::item_label(&child.number),
            ElementKind::Penalty => label::penalty_label(),
            _ => String::new(),
        };

        out.push_body(
            report,
            BlockSpec {
                slug: child_slug.clone(),
                urn: element_urn(child).map(str::to_string),
                label: (!child_label.is_empty()).then_some(child_label.as_str()),
                body: &child.text,
                struck: child.textually_revoked,
            },
            &child.text,
        );

        emit_children(
            child,
            &child_slug,
            parent_revoked || child.textually_revoked,
            out,
            report,
        );
    }
}

fn element_urn(element: &LawElement) -> Option<&str> {
    if element.urn.is_empty() {
        None
    } else {
        Some(element.urn.as_str())
    }
}

#[derive(Default)]
struct ArticleAccumulator {
    blocks: Vec<lei_core::plate::PlateBlock>,
    plano: Vec<String>,
    search: Vec<String>,
}

impl ArticleAccumulator {
    fn push_body(&mut self, report: &mut EmitReport, spec: BlockSpec<'_>, raw_body: &str) {
        let block = build_block(spec);
        validate_urn_slug(&block, report);

        let body = display_body(raw_body);
        if !body.is_empty() {
            self.plano.push(body);
        }
        self.search.push(block.search_text.clone());
        self.blocks.push(block);
    }
}

/// URN→slug round trip. Differences are counted and logged; emission goes
/// on regardless.
fn validate_urn_slug(block: &lei_core::plate::PlateBlock, report: &mut EmitReport) {
    let Some(urn) = &block.urn else {
        return;
    };
    let Some(fragment) = fragment_of(urn) else {
        return;
    };
    let conversion = fragment_to_slug(fragment);
    let expected = strip_revocation_shift(&block.slug);
    if conversion.slug != expected
        || !conversion.warnings.is_empty()
        || !lei_core::urn::is_valid_slug(&conversion.slug)
    {
        warn!(
            "urn/slug divergence: {} vs {} ({} warnings)",
            conversion.slug,
            block.slug,
            conversion.warnings.len()
        );
        report.urn_slug_mismatches += 1;
    }
}
