//! Element-tree assembly.
//!
//! Both HTML parsers reduce their sources to a stream of classified blocks;
//! this module owns the containment rules (`article ⊃ paragraph ⊃ inciso ⊃
//! alínea ⊃ item`), the pending-header and pending-epigraph machinery, the
//! hierarchy path bookkeeping, and `Parte geral` synthesis.

use std::collections::BTreeMap;

use lei_core::annotation::is_textually_revoked;
use lei_core::element::{ElementKind, HierarchyLevel, LawElement};
use lei_core::number::{clause_arabic, slug_number};
use lei_core::structure::{ParsedLaw, Structure};
use log::{debug, warn};

// ---------------------------------------------------------------------------
// Pending header state
// ---------------------------------------------------------------------------

/// Two-state machine for structural headers whose descriptive line follows
/// on the next block (`TÍTULO I` / `DOS CRIMES CONTRA A PESSOA`).
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingHeader {
    Idle,
    Waiting {
        level: HierarchyLevel,
        heading: String,
    },
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Builds the article trees and grouping structure from classified blocks.
pub struct Assembler {
    base_urn: String,
    articles: Vec<LawElement>,
    structure: Structure,
    path: BTreeMap<HierarchyLevel, String>,
    pending: PendingHeader,
    /// Bold rubric waiting for its owner: the next paragraph/clause of the
    /// current article, or the next article when one starts first.
    pending_epigraph: Option<String>,
    /// `true` when the source mentions "Parte Geral" anywhere, enabling
    /// synthesis of the implicit first part.
    mentions_parte_geral: bool,
}

impl Assembler {
    pub fn new(base_urn: &str, mentions_parte_geral: bool) -> Self {
        Self {
            base_urn: base_urn.to_string(),
            articles: Vec::new(),
            structure: Structure::new(),
            path: BTreeMap::new(),
            pending: PendingHeader::Idle,
            pending_epigraph: None,
            mentions_parte_geral,
        }
    }

    pub fn finish(self) -> ParsedLaw {
        ParsedLaw {
            articles: self.articles,
            structure: self.structure,
        }
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// `true` while a structural header waits for its descriptive line.
    pub fn header_pending(&self) -> bool {
        matches!(self.pending, PendingHeader::Waiting { .. })
    }

    /// Terminator of the last textual element's body, for the text parser's
    /// continuation heuristic.
    pub fn last_body_char(&mut self) -> Option<char> {
        self.articles
            .last_mut()
            .map(|a| a.last_textual_mut().text.trim_end().chars().last())?
    }

    // -----------------------------------------------------------------------
    // Block events
    // -----------------------------------------------------------------------

    pub fn on_hierarchy(&mut self, level: HierarchyLevel, heading: String) {
        self.pending = PendingHeader::Idle;
        self.synthesize_parte_geral(level);
        self.structure.open(level, heading.clone());
        self.path.retain(|l, _| *l < level);
        self.path.insert(level, heading.clone());
        self.pending = PendingHeader::Waiting { level, heading };
    }

    pub fn on_article(&mut self, number: String, text: String, struck: bool) {
        self.pending = PendingHeader::Idle;
        let mut article = LawElement::new(ElementKind::Article, number, text);
        article.urn = format!("{}!art{}", self.base_urn, slug_number(&article.number));
        article.path = self.path.clone();
        article.epigraph = self.pending_epigraph.take();
        if struck || is_textually_revoked(&article.text) {
            article.mark_textually_revoked();
        }
        debug!("article {} ({})", article.number, article.urn);
        self.articles.push(article);
    }

    pub fn on_paragraph(&mut self, number: String, text: String, struck: bool) {
        let urn_token = if number == "unico" {
            "par1u".to_string()
        } else {
            slug_number(&number)
        };
        self.attach_child(ElementKind::Paragraph, number, text, &format!("par{urn_token}"), struck);
    }

    pub fn on_inciso(&mut self, number: String, text: String, struck: bool) {
        let token = format!("inc{}", clause_arabic(&number));
        self.attach_child(ElementKind::Inciso, number, text, &token, struck);
    }

    pub fn on_alinea(&mut self, letter: String, text: String, struck: bool) {
        let token = format!("ali{}", slug_number(&letter));
        self.attach_child(ElementKind::Alinea, letter, text, &token, struck);
    }

    pub fn on_item(&mut self, number: String, text: String, struck: bool) {
        let token = format!("ite{}", slug_number(&number));
        self.attach_child(ElementKind::Item, number, text, &token, struck);
    }

    pub fn on_penalty(&mut self, text: String, struck: bool) {
        self.pending = PendingHeader::Idle;
        let Some(article) = self.articles.last_mut() else {
            self.structure.orphan(text);
            return;
        };
        let mut penalty = LawElement::new(ElementKind::Penalty, "", text);
        if struck || article.textually_revoked {
            penalty.mark_textually_revoked();
        }
        // A penalty binds to the unit it follows: the article's last
        // paragraph when one exists, the caput otherwise.
        match article.last_of_kind_mut(ElementKind::Paragraph) {
            Some(paragraph) => paragraph.children.push(penalty),
            None => article.children.push(penalty),
        }
    }

    pub fn on_epigraph(&mut self, text: String) {
        self.pending = PendingHeader::Idle;
        if let Some(previous) = self.pending_epigraph.replace(text) {
            warn!("discarding unattached epigraph: {previous}");
        }
    }

    pub fn on_continuation(&mut self, text: String) {
        if self.try_pending_description(&text) {
            return;
        }
        match self.articles.last_mut() {
            Some(article) => article.last_textual_mut().append_text(&text),
            None => self.structure.orphan(text),
        }
    }

    pub fn on_orphan(&mut self, text: String) {
        if self.try_pending_description(&text) {
            return;
        }
        self.structure.orphan(text);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Fold a descriptive line into the waiting header. Returns `true` when
    /// the text was consumed.
    fn try_pending_description(&mut self, text: &str) -> bool {
        let PendingHeader::Waiting { level, heading } = self.pending.clone() else {
            return false;
        };
        let full = format!("{heading} - {text}");
        self.structure.amend_last(level, &full);
        self.path.insert(level, full);
        self.pending = PendingHeader::Idle;
        true
    }

    fn synthesize_parte_geral(&mut self, incoming: HierarchyLevel) {
        if incoming == HierarchyLevel::Titulo
            && self.mentions_parte_geral
            && self.structure.is_empty_at(HierarchyLevel::Parte)
            && self.structure.is_empty_at(HierarchyLevel::Titulo)
        {
            self.structure.open(HierarchyLevel::Parte, "Parte geral");
            self.path.insert(HierarchyLevel::Parte, "Parte geral".to_string());
        }
    }

    fn attach_child(
        &mut self,
        kind: ElementKind,
        number: String,
        text: String,
        urn_token: &str,
        struck: bool,
    ) {
        self.pending = PendingHeader::Idle;
        let epigraph = self.pending_epigraph.take();
        let Some(article) = self.articles.last_mut() else {
            self.pending_epigraph = epigraph;
            self.structure.orphan(text);
            return;
        };

        let parent = container_for(article, kind);
        let mut child = LawElement::new(kind, number, text);
        child.urn = format!("{}_{urn_token}", parent.urn);
        child.epigraph = epigraph;
        if struck || parent.textually_revoked {
            child.mark_textually_revoked();
        }
        parent.children.push(child);
    }
}

/// The deepest element a new child of `kind` should nest under, following
/// `article ⊃ paragraph ⊃ inciso ⊃ alínea ⊃ item`. Absent intermediate
/// levels collapse upward (an inciso directly under the caput is legal).
fn container_for(article: &mut LawElement, kind: ElementKind) -> &mut LawElement {
    let chain: &[ElementKind] = match kind {
        ElementKind::Paragraph => &[],
        ElementKind::Inciso => &[ElementKind::Paragraph],
        ElementKind::Alinea => &[ElementKind::Paragraph, ElementKind::Inciso],
        ElementKind::Item => &[
            ElementKind::Paragraph,
            ElementKind::Inciso,
            ElementKind::Alinea,
        ],
        _ => &[],
    };

    let mut node = article;
    for level in chain {
        let has = node.children.iter().rev().any(|c| c.kind == *level);
        if !has {
            continue;
        }
        let idx = node
            .children
            .iter()
            .rposition(|c| c.kind == *level)
            .unwrap_or(0);
        node = &mut node.children[idx];
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    const URN: &str = "urn:lex:br:federal:decreto.lei:1940-12-07;2848";

    fn assembler() -> Assembler {
        Assembler::new(URN, false)
    }

    #[test]
    fn article_then_paragraph_then_inciso_nest() {
        let mut a = assembler();
        a.on_article("121".into(), "Matar alguém:".into(), false);
        a.on_paragraph("2".into(), "Se o homicídio é cometido:".into(), false);
        a.on_inciso("IV".into(), "à traição;".into(), false);

        let parsed = a.finish();
        let art = &parsed.articles[0];
        assert_eq!(art.urn, format!("{URN}!art121"));
        let par = &art.children[0];
        assert_eq!(par.kind, ElementKind::Paragraph);
        assert_eq!(par.urn, format!("{URN}!art121_par2"));
        let inc = &par.children[0];
        assert_eq!(inc.number, "IV");
        assert_eq!(inc.urn, format!("{URN}!art121_par2_inc4"));
    }

    #[test]
    fn inciso_without_paragraph_hangs_off_caput() {
        let mut a = assembler();
        a.on_article("5".into(), "Todos são iguais:".into(), false);
        a.on_inciso("I".into(), "homens e mulheres;".into(), false);

        let parsed = a.finish();
        let inc = &parsed.articles[0].children[0];
        assert_eq!(inc.urn, format!("{URN}!art5_inc1"));
    }

    #[test]
    fn alinea_and_item_descend_the_chain() {
        let mut a = assembler();
        a.on_article("1".into(), "Caput.".into(), false);
        a.on_inciso("II".into(), "inciso:".into(), false);
        a.on_alinea("b".into(), "alínea:".into(), false);
        a.on_item("3".into(), "item;".into(), false);

        let parsed = a.finish();
        let inc = &parsed.articles[0].children[0];
        let ali = &inc.children[0];
        let ite = &ali.children[0];
        assert_eq!(ali.urn, format!("{URN}!art1_inc2_alib"));
        assert_eq!(ite.urn, format!("{URN}!art1_inc2_alib_ite3"));
    }

    #[test]
    fn penalty_attaches_to_last_paragraph_else_article() {
        let mut a = assembler();
        a.on_article("155".into(), "Subtrair coisa alheia móvel:".into(), false);
        a.on_penalty("reclusão, de um a quatro anos, e multa.".into(), false);
        a.on_paragraph("4".into(), "A pena é de reclusão:".into(), false);
        a.on_penalty("reclusão, de dois a oito anos.".into(), false);

        let parsed = a.finish();
        let art = &parsed.articles[0];
        assert_eq!(art.children[0].kind, ElementKind::Penalty);
        let par = &art.children[1];
        assert_eq!(par.children[0].kind, ElementKind::Penalty);
    }

    #[test]
    fn header_waits_for_description_then_amends() {
        let mut a = assembler();
        a.on_hierarchy(HierarchyLevel::Titulo, "TÍTULO I".into());
        a.on_orphan("DOS CRIMES CONTRA A PESSOA".into());
        a.on_article("121".into(), "Matar alguém:".into(), false);

        let parsed = a.finish();
        assert_eq!(
            parsed.structure.flat.titulos,
            vec!["TÍTULO I - DOS CRIMES CONTRA A PESSOA"]
        );
        assert_eq!(
            parsed.articles[0].path[&HierarchyLevel::Titulo],
            "TÍTULO I - DOS CRIMES CONTRA A PESSOA"
        );
    }

    #[test]
    fn header_description_slot_clears_on_structural_block() {
        let mut a = assembler();
        a.on_hierarchy(HierarchyLevel::Titulo, "TÍTULO I".into());
        a.on_hierarchy(HierarchyLevel::Capitulo, "CAPÍTULO I".into());
        a.on_orphan("DOS CRIMES CONTRA A VIDA".into());

        let parsed = a.finish();
        // The description bound to the chapter, not the title.
        assert_eq!(parsed.structure.flat.titulos, vec!["TÍTULO I"]);
        assert_eq!(
            parsed.structure.flat.capitulos,
            vec!["CAPÍTULO I - DOS CRIMES CONTRA A VIDA"]
        );
    }

    #[test]
    fn epigraph_binds_to_next_article() {
        let mut a = assembler();
        a.on_epigraph("Homicídio simples".into());
        a.on_article("121".into(), "Matar alguém:".into(), false);

        let parsed = a.finish();
        assert_eq!(parsed.articles[0].epigraph.as_deref(), Some("Homicídio simples"));
    }

    #[test]
    fn epigraph_inside_article_binds_to_next_clause() {
        let mut a = assembler();
        a.on_article("121".into(), "Matar alguém:".into(), false);
        a.on_epigraph("Caso de diminuição de pena".into());
        a.on_paragraph("1".into(), "Se o agente comete o crime...".into(), false);

        let parsed = a.finish();
        let par = &parsed.articles[0].children[0];
        assert_eq!(par.epigraph.as_deref(), Some("Caso de diminuição de pena"));
        assert!(parsed.articles[0].epigraph.is_none());
    }

    #[test]
    fn struck_article_cascades_to_children() {
        let mut a = assembler();
        a.on_article("240".into(), "Adultério.".into(), true);
        a.on_penalty("detenção, de quinze dias a seis meses.".into(), true);

        let parsed = a.finish();
        let art = &parsed.articles[0];
        assert!(art.textually_revoked);
        assert!(!art.in_force);
        assert!(art.children[0].textually_revoked);
    }

    #[test]
    fn revogado_annotation_marks_article() {
        let mut a = assembler();
        a.on_article(
            "217".into(),
            "(Revogado pela Lei nº 11.106, de 2005)".into(),
            false,
        );
        let parsed = a.finish();
        assert!(parsed.articles[0].textually_revoked);
    }

    #[test]
    fn parte_geral_synthesized_before_first_title() {
        let mut a = Assembler::new(URN, true);
        a.on_hierarchy(HierarchyLevel::Titulo, "TÍTULO I".into());
        a.on_article("1".into(), "Texto.".into(), false);

        let parsed = a.finish();
        assert_eq!(parsed.structure.flat.partes, vec!["Parte geral"]);
        assert_eq!(parsed.structure.flat.titulos, vec!["TÍTULO I"]);
        // The synthetic part nests the title under it in the tree.
        assert_eq!(parsed.structure.hierarquia[0].titulo, "Parte geral");
        assert_eq!(parsed.structure.hierarquia[0].filhos[0].titulo, "TÍTULO I");
    }

    #[test]
    fn no_synthesis_without_mention() {
        let mut a = assembler();
        a.on_hierarchy(HierarchyLevel::Titulo, "TÍTULO I".into());
        let parsed = a.finish();
        assert!(parsed.structure.flat.partes.is_empty());
    }

    #[test]
    fn orphans_collect_when_no_article_is_open() {
        let mut a = assembler();
        a.on_orphan("O PRESIDENTE DA REPÚBLICA".into());
        a.on_continuation("decreta:".into());
        let parsed = a.finish();
        assert_eq!(parsed.structure.flat.textos_orfaos.len(), 2);
    }

    #[test]
    fn continuation_extends_deepest_textual() {
        let mut a = assembler();
        a.on_article("121".into(), "Matar".into(), false);
        a.on_continuation("alguém:".into());
        let parsed = a.finish();
        assert_eq!(parsed.articles[0].text, "Matar alguém:");
    }
}
