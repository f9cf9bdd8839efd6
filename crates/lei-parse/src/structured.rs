//! Structured-document parser.
//!
//! Walks the `hasPart` tree of the structured endpoint's JSON. Each node is
//! classified by the type prefix of its URN fragment, with human-readable
//! name cues as the fallback; hierarchy nodes contribute to the grouping
//! structure and the running context, article nodes become [`LawElement`]
//! trees.

use std::collections::BTreeMap;

use lei_core::element::{ElementKind, HierarchyLevel, LawElement};
use lei_core::number::{is_roman, number_from_token};
use lei_core::structure::{ParsedLaw, Structure};
use lei_core::urn::fragment_of;
use log::debug;
use serde_json::Value;

use crate::error::{ParseError, Result};

/// Parse a structured document into the intermediate law.
pub fn parse_structured(doc: &Value) -> Result<ParsedLaw> {
    let parts = doc
        .get("hasPart")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingHasPart)?;

    let mut walker = Walker {
        structure: Structure::new(),
        articles: Vec::new(),
    };
    let path = BTreeMap::new();
    for node in parts {
        walker.walk(node, &path);
    }

    if walker.articles.is_empty() {
        return Err(ParseError::NoArticles);
    }
    Ok(ParsedLaw {
        articles: walker.articles,
        structure: walker.structure,
    })
}

struct Walker {
    structure: Structure,
    articles: Vec<LawElement>,
}

impl Walker {
    fn walk(&mut self, node: &Value, path: &BTreeMap<HierarchyLevel, String>) {
        let node = effective(node);
        let urn = node_urn(node).unwrap_or_default();
        let fragment = fragment_of(&urn).unwrap_or_default();

        match classify_node(fragment, node) {
            NodeClass::Hierarchy(level) => {
                let heading = heading_of(node);
                debug!("hierarchy {level}: {heading}");
                self.structure.open(level, heading.clone());
                let mut child_path = path.clone();
                child_path.retain(|l, _| *l < level);
                child_path.insert(level, heading);
                for child in children(node) {
                    self.walk(child, &child_path);
                }
            }
            NodeClass::Article => {
                let article = self.build_article(node, &urn, fragment, path);
                self.articles.push(article);
            }
            NodeClass::Body(_) => {
                // A body element outside an article: the tree is inverted or
                // truncated. Keep the text rather than dropping it.
                if let Some(text) = node_text(node) {
                    self.structure.orphan(text);
                }
            }
            NodeClass::Unknown => {
                // Containers without a fragment (e.g. an attachment wrapper)
                // often still nest real parts.
                for child in children(node) {
                    self.walk(child, path);
                }
            }
        }
    }

    fn build_article(
        &mut self,
        node: &Value,
        urn: &str,
        fragment: &str,
        path: &BTreeMap<HierarchyLevel, String>,
    ) -> LawElement {
        let token = fragment.rsplit('_').next().unwrap_or(fragment);
        let number = number_from_token(token.strip_prefix("art").unwrap_or(token));

        let mut article = LawElement::new(ElementKind::Article, number, String::new());
        article.urn = urn.to_string();
        article.path = path.clone();
        article.in_force = legal_force(node);
        if !article.in_force {
            article.textually_revoked = true;
        }

        for child in children(node) {
            self.walk_body(child, &mut article);
        }
        // Articles without an explicit caput node carry their text directly.
        if article.text.is_empty() {
            if let Some(text) = node_text(node) {
                article.text = text;
            }
        }
        article
    }

    /// Descend the body side of an article: caput, paragraphs, clauses.
    fn walk_body(&mut self, node: &Value, parent: &mut LawElement) {
        let node = effective(node);
        let urn = node_urn(node).unwrap_or_default();
        let fragment = fragment_of(&urn).unwrap_or_default();

        let kind = match classify_node(fragment, node) {
            NodeClass::Body(kind) => kind,
            NodeClass::Article | NodeClass::Hierarchy(_) | NodeClass::Unknown => {
                if let Some(text) = node_text(node) {
                    self.structure.orphan(text);
                }
                return;
            }
        };

        if kind == ElementKind::Caput {
            if let Some(text) = node_text(node) {
                parent.text = text;
            }
            // Incisos of the caput arrive as the caput's own children.
            for child in children(node) {
                self.walk_body(child, parent);
            }
            return;
        }

        let token = fragment.rsplit('_').next().unwrap_or(fragment);
        let number = body_number(kind, token, node);

        let mut element = LawElement::new(kind, number, node_text(node).unwrap_or_default());
        element.urn = urn.to_string();
        element.in_force = legal_force(node);
        if !element.in_force {
            element.textually_revoked = true;
        }
        for child in children(node) {
            self.walk_body(child, &mut element);
        }
        parent.children.push(element);
    }
}

// ---------------------------------------------------------------------------
// Node inspection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeClass {
    Hierarchy(HierarchyLevel),
    Article,
    Body(ElementKind),
    Unknown,
}

/// The node to read fields from: the most recent `workExample` when one is
/// present (the last entry when it is a list), the node itself otherwise.
fn effective(node: &Value) -> &Value {
    match node.get("workExample") {
        Some(Value::Array(list)) => list.last().unwrap_or(node),
        Some(example @ Value::Object(_)) => example,
        _ => node,
    }
}

fn node_urn(node: &Value) -> Option<String> {
    ["urn", "legislationIdentifier", "@id"]
        .iter()
        .find_map(|k| node.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn node_text(node: &Value) -> Option<String> {
    ["text", "description"]
        .iter()
        .find_map(|k| node.get(*k).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn node_name(node: &Value) -> Option<&str> {
    node.get("name").and_then(Value::as_str)
}

fn children(node: &Value) -> &[Value] {
    node.get("hasPart")
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// `"<HEADING> - <DESCRIPTION>"`, the contract for context and structure
/// lists.
fn heading_of(node: &Value) -> String {
    let name = node_name(node).unwrap_or_default().trim();
    match node.get("description").and_then(Value::as_str) {
        Some(desc) if !desc.trim().is_empty() => format!("{name} - {}", desc.trim()),
        _ => name.to_string(),
    }
}

fn legal_force(node: &Value) -> bool {
    match node.get("legislationLegalForce") {
        Some(Value::String(s)) => !s.contains("NotInForce"),
        Some(Value::Object(obj)) => obj
            .values()
            .filter_map(Value::as_str)
            .all(|s| !s.contains("NotInForce")),
        _ => true,
    }
}

/// Classification by URN fragment token, then name cues.
fn classify_node(fragment: &str, node: &Value) -> NodeClass {
    let last = fragment.rsplit('_').next().unwrap_or(fragment);
    let prefix: String = last.chars().take_while(|c| c.is_ascii_alphabetic()).collect();

    match prefix.as_str() {
        "art" => return NodeClass::Article,
        "par" => return NodeClass::Body(ElementKind::Paragraph),
        "inc" => return NodeClass::Body(ElementKind::Inciso),
        "ali" => return NodeClass::Body(ElementKind::Alinea),
        "ite" => return NodeClass::Body(ElementKind::Item),
        "cpt" => return NodeClass::Body(ElementKind::Caput),
        "prt" => return NodeClass::Hierarchy(HierarchyLevel::Parte),
        "liv" => return NodeClass::Hierarchy(HierarchyLevel::Livro),
        "tit" => return NodeClass::Hierarchy(HierarchyLevel::Titulo),
        "stl" => return NodeClass::Hierarchy(HierarchyLevel::Subtitulo),
        "cap" => return NodeClass::Hierarchy(HierarchyLevel::Capitulo),
        "sec" => return NodeClass::Hierarchy(HierarchyLevel::Secao),
        "sub" => return NodeClass::Hierarchy(HierarchyLevel::Subsecao),
        _ => {}
    }

    // Name cues when the fragment is absent or unrecognized.
    let Some(name) = node_name(node) else {
        return NodeClass::Unknown;
    };
    let name = name.trim();
    if name.starts_with("Art") {
        return NodeClass::Article;
    }
    if name.starts_with('§') || name.to_lowercase().starts_with("parágrafo") {
        return NodeClass::Body(ElementKind::Paragraph);
    }
    if is_roman(name.trim_end_matches(['-', ' '])) {
        return NodeClass::Body(ElementKind::Inciso);
    }
    let mut chars = name.chars();
    if let (Some(first), Some(')')) = (chars.next(), chars.next()) {
        if first.is_ascii_lowercase() {
            return NodeClass::Body(ElementKind::Alinea);
        }
    }
    for (keyword, level) in [
        ("PARTE", HierarchyLevel::Parte),
        ("LIVRO", HierarchyLevel::Livro),
        ("TÍTULO", HierarchyLevel::Titulo),
        ("TITULO", HierarchyLevel::Titulo),
        ("SUBTÍTULO", HierarchyLevel::Subtitulo),
        ("CAPÍTULO", HierarchyLevel::Capitulo),
        ("CAPITULO", HierarchyLevel::Capitulo),
        ("SUBSEÇÃO", HierarchyLevel::Subsecao),
        ("SEÇÃO", HierarchyLevel::Secao),
        ("SECAO", HierarchyLevel::Secao),
    ] {
        if name.to_uppercase().starts_with(keyword) {
            return NodeClass::Hierarchy(level);
        }
    }
    NodeClass::Unknown
}

/// Canonical number for a body element from its fragment token (or name).
fn body_number(kind: ElementKind, token: &str, node: &Value) -> String {
    let type_prefix = match kind {
        ElementKind::Paragraph => "par",
        ElementKind::Inciso => "inc",
        ElementKind::Alinea => "ali",
        ElementKind::Item => "ite",
        _ => "",
    };
    let digits = token.strip_prefix(type_prefix).unwrap_or(token);
    match kind {
        ElementKind::Paragraph => {
            if digits == "1u" || digits == "u" {
                "unico".to_string()
            } else if node_name(node).is_some_and(|n| n.to_lowercase().contains("único")) {
                "unico".to_string()
            } else if digits.is_empty() {
                // Fragment-less node classified by its name cue: pull the
                // number out of the printed label (`§ 2º`).
                node_name(node)
                    .map(|n| n.chars().filter(char::is_ascii_digit).collect::<String>())
                    .unwrap_or_default()
            } else {
                number_from_token(digits)
            }
        }
        ElementKind::Inciso => {
            // Prefer the roman name when the node carries one.
            if let Some(name) = node_name(node) {
                let trimmed = name.trim().trim_end_matches([' ', '-', '–']);
                if is_roman(trimmed) {
                    return trimmed.to_string();
                }
            }
            match digits.parse::<u32>() {
                Ok(n) => arabic_to_roman(n),
                Err(_) => number_from_token(digits),
            }
        }
        ElementKind::Alinea => digits.to_lowercase(),
        _ => number_from_token(digits),
    }
}

/// Minimal arabic → roman for clause numbering.
fn arabic_to_roman(mut n: u32) -> String {
    const STEPS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, glyph) in STEPS {
        while n >= value {
            out.push_str(glyph);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code_fixture() -> Value {
        json!({
            "name": "Código Penal",
            "hasPart": [
                {
                    "urn": "urn:lex:br:federal:decreto.lei:1940-12-07;2848!prt1",
                    "name": "PARTE GERAL",
                    "hasPart": [
                        {
                            "urn": "urn:lex:br:federal:decreto.lei:1940-12-07;2848!tit1",
                            "name": "TÍTULO I",
                            "description": "DA APLICAÇÃO DA LEI PENAL",
                            "hasPart": [
                                {
                                    "urn": "urn:lex:br:federal:decreto.lei:1940-12-07;2848!art1",
                                    "name": "Art. 1º",
                                    "legislationLegalForce": "InForce",
                                    "hasPart": [
                                        {
                                            "urn": "urn:lex:br:federal:decreto.lei:1940-12-07;2848!art1_cpt",
                                            "text": "Não há crime sem lei anterior que o defina."
                                        },
                                        {
                                            "urn": "urn:lex:br:federal:decreto.lei:1940-12-07;2848!art1_par1u",
                                            "name": "Parágrafo único",
                                            "text": "Texto do parágrafo."
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn walks_hierarchy_and_articles() {
        let parsed = parse_structured(&code_fixture()).unwrap();
        assert_eq!(parsed.structure.flat.partes, vec!["PARTE GERAL"]);
        assert_eq!(
            parsed.structure.flat.titulos,
            vec!["TÍTULO I - DA APLICAÇÃO DA LEI PENAL"]
        );
        assert_eq!(parsed.articles.len(), 1);

        let art = &parsed.articles[0];
        assert_eq!(art.number, "1");
        assert_eq!(art.text, "Não há crime sem lei anterior que o defina.");
        assert_eq!(
            art.path[&HierarchyLevel::Titulo],
            "TÍTULO I - DA APLICAÇÃO DA LEI PENAL"
        );

        let par = &art.children[0];
        assert_eq!(par.kind, ElementKind::Paragraph);
        assert_eq!(par.number, "unico");
    }

    #[test]
    fn picks_last_work_example() {
        let node = json!({
            "hasPart": [{
                "workExample": [
                    { "urn": "urn:x!art2", "text": "Versão antiga." },
                    { "urn": "urn:x!art2", "text": "Versão recente." }
                ]
            }]
        });
        let parsed = parse_structured(&node).unwrap();
        assert_eq!(parsed.articles[0].text, "Versão recente.");
    }

    #[test]
    fn not_in_force_marks_revoked() {
        let node = json!({
            "hasPart": [{
                "urn": "urn:x!art240",
                "legislationLegalForce": "NotInForce",
                "text": "Adultério."
            }]
        });
        let parsed = parse_structured(&node).unwrap();
        assert!(!parsed.articles[0].in_force);
        assert!(parsed.articles[0].textually_revoked);
    }

    #[test]
    fn inciso_number_prefers_roman_name() {
        let node = json!({
            "hasPart": [{
                "urn": "urn:x!art5",
                "hasPart": [
                    { "urn": "urn:x!art5_cpt", "text": "Caput." },
                    { "urn": "urn:x!art5_inc4", "name": "IV", "text": "inciso quatro;" }
                ]
            }]
        });
        let parsed = parse_structured(&node).unwrap();
        let inc = &parsed.articles[0].children[0];
        assert_eq!(inc.kind, ElementKind::Inciso);
        assert_eq!(inc.number, "IV");
    }

    #[test]
    fn inciso_number_from_token_converts_to_roman() {
        let node = json!({
            "hasPart": [{
                "urn": "urn:x!art5",
                "hasPart": [
                    { "urn": "urn:x!art5_inc12", "text": "inciso doze;" }
                ]
            }]
        });
        let parsed = parse_structured(&node).unwrap();
        assert_eq!(parsed.articles[0].children[0].number, "XII");
    }

    #[test]
    fn missing_has_part_is_an_error() {
        assert!(matches!(
            parse_structured(&json!({ "name": "x" })),
            Err(ParseError::MissingHasPart)
        ));
    }

    #[test]
    fn name_cue_fallback_classifies_paragraph() {
        let node = json!({
            "hasPart": [{
                "urn": "urn:x!art7",
                "hasPart": [
                    { "name": "§ 2º", "text": "Texto do parágrafo segundo." }
                ]
            }]
        });
        let parsed = parse_structured(&node).unwrap();
        let par = &parsed.articles[0].children[0];
        assert_eq!(par.kind, ElementKind::Paragraph);
    }

    #[test]
    fn article_letter_suffix_from_token() {
        let node = json!({
            "hasPart": [{ "urn": "urn:x!art121a", "text": "Texto." }]
        });
        let parsed = parse_structured(&node).unwrap();
        assert_eq!(parsed.articles[0].number, "121-A");
    }
}
