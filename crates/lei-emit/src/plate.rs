//! Plate-block construction.
//!
//! Joins a typographic label with a body text, runs the annotation splitter,
//! and applies the revoked/vetoed substitutions and styling.

use lei_core::annotation::{infer_status, is_effectively_empty, split_annotations, AnnotatedStatus};
use lei_core::plate::{PlateBlock, TextRun};

pub const REVOKED_PLACEHOLDER: &str = "Dispositivo revogado.";
pub const VETOED_PLACEHOLDER: &str = "Dispositivo vetado.";

/// Inputs for one body block.
pub struct BlockSpec<'a> {
    pub slug: String,
    pub urn: Option<String>,
    /// Printed label (`Art. 121`, `§ 2º`, `IV -`), bold in the output.
    pub label: Option<&'a str>,
    pub body: &'a str,
    /// Strike-through revocation inherited from the element.
    pub struck: bool,
}

/// Build the block: split annotations, infer status, style runs.
pub fn build_block(spec: BlockSpec<'_>) -> PlateBlock {
    let split = split_annotations(spec.body);
    let (body_text, revogado, vetado) = substitute(&split, spec.struck);

    let struck_style = revogado || vetado || spec.struck;
    let mut children = Vec::new();
    if let Some(label) = spec.label {
        let mut run = TextRun::bold(format!("{label} "));
        if struck_style {
            run.strikethrough = true;
            run.color = Some(lei_core::plate::REVOKED_COLOR.to_string());
        }
        children.push(run);
    }
    if !body_text.is_empty() {
        children.push(if struck_style {
            TextRun::struck(body_text.clone())
        } else {
            TextRun::plain(body_text.clone())
        });
    }

    let search_text = join_label(spec.label, &body_text);
    let mut block = PlateBlock::new(spec.slug, children, search_text);
    block.urn = spec.urn;
    block.revogado = revogado || spec.struck;
    block.vetado = vetado;
    if !split.annotations.is_empty() {
        block.texto_original = Some(join_label(spec.label, &split.original));
        block.anotacoes = Some(split.annotations);
    }
    block
}

/// Bold-only epigraph/rubric block.
pub fn epigraph_block(slug: String, text: &str) -> PlateBlock {
    let clean = split_annotations(text).clean;
    PlateBlock::new(slug, vec![TextRun::bold(clean.clone())], clean)
}

/// The display body after annotation stripping and placeholder substitution,
/// as it contributes to `texto_plano`.
pub fn display_body(body: &str) -> String {
    substitute(&split_annotations(body), false).0
}

/// `(body, revogado, vetado)` after the empty-body substitution rule.
fn substitute(
    split: &lei_core::annotation::SplitText,
    struck: bool,
) -> (String, bool, bool) {
    if is_effectively_empty(&split.clean) && !split.annotations.is_empty() {
        match infer_status(&split.annotations) {
            AnnotatedStatus::Revoked => return (REVOKED_PLACEHOLDER.to_string(), true, false),
            AnnotatedStatus::Vetoed => return (VETOED_PLACEHOLDER.to_string(), false, true),
            AnnotatedStatus::Valid => {}
        }
    }
    (split.clean.clone(), struck, false)
}

fn join_label(label: Option<&str>, body: &str) -> String {
    match label {
        Some(label) if !body.is_empty() => format!("{label} {body}"),
        Some(label) => label.to_string(),
        None => body.to_string(),
    }
}
