use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ElementKind
// ---------------------------------------------------------------------------

/// Structural role of an element within a law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Article,
    Caput,
    Paragraph,
    /// Roman-numeral clause under a caput or paragraph.
    Inciso,
    /// Single-lowercase-letter clause under an inciso.
    Alinea,
    Item,
    /// `Pena -` block bound to the preceding enumerated unit.
    Penalty,
    /// Short non-normative title preceding an article or a paragraph/clause.
    Rubric,
    Part,
    Book,
    Title,
    Subtitle,
    Chapter,
    Section,
    Subsection,
}

impl ElementKind {
    /// Return the canonical snake_case string representation of this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Article => "article",
            ElementKind::Caput => "caput",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Inciso => "inciso",
            ElementKind::Alinea => "alinea",
            ElementKind::Item => "item",
            ElementKind::Penalty => "penalty",
            ElementKind::Rubric => "rubric",
            ElementKind::Part => "part",
            ElementKind::Book => "book",
            ElementKind::Title => "title",
            ElementKind::Subtitle => "subtitle",
            ElementKind::Chapter => "chapter",
            ElementKind::Section => "section",
            ElementKind::Subsection => "subsection",
        }
    }

    /// `true` for the seven grouping levels that live in `Structure` rather
    /// than inside an article.
    pub fn is_hierarchy(&self) -> bool {
        self.hierarchy_level().is_some()
    }

    /// `true` for elements that carry body text inside an article.
    pub fn is_body(&self) -> bool {
        matches!(
            self,
            ElementKind::Caput
                | ElementKind::Paragraph
                | ElementKind::Inciso
                | ElementKind::Alinea
                | ElementKind::Item
                | ElementKind::Penalty
        )
    }

    /// Map a grouping kind to its [`HierarchyLevel`].
    pub fn hierarchy_level(&self) -> Option<HierarchyLevel> {
        match self {
            ElementKind::Part => Some(HierarchyLevel::Parte),
            ElementKind::Book => Some(HierarchyLevel::Livro),
            ElementKind::Title => Some(HierarchyLevel::Titulo),
            ElementKind::Subtitle => Some(HierarchyLevel::Subtitulo),
            ElementKind::Chapter => Some(HierarchyLevel::Capitulo),
            ElementKind::Section => Some(HierarchyLevel::Secao),
            ElementKind::Subsection => Some(HierarchyLevel::Subsecao),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HierarchyLevel
// ---------------------------------------------------------------------------

/// The seven grouping levels of a Brazilian federal law, ordered from the
/// outermost (`Parte`) to the innermost (`Subsecao`).
///
/// The `Ord` derive follows declaration order, so a cursor transition at
/// level L can clear "all levels deeper than L" with a simple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    Parte,
    Livro,
    Titulo,
    Subtitulo,
    Capitulo,
    Secao,
    Subsecao,
}

impl HierarchyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyLevel::Parte => "parte",
            HierarchyLevel::Livro => "livro",
            HierarchyLevel::Titulo => "titulo",
            HierarchyLevel::Subtitulo => "subtitulo",
            HierarchyLevel::Capitulo => "capitulo",
            HierarchyLevel::Secao => "secao",
            HierarchyLevel::Subsecao => "subsecao",
        }
    }

}

impl std::fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LawElement
// ---------------------------------------------------------------------------

/// Intermediate node of the parsed law tree.
///
/// Elements form a tree: an article owns its paragraphs and clauses in
/// `children`, in source order. The tree only lives between parse and emit;
/// the emitted JSON is the sole persisted artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawElement {
    /// Structural role of this element.
    pub kind: ElementKind,
    /// Canonical number string: arabic for items and paragraphs, uppercase
    /// roman for incisos, a single lowercase letter for alíneas, `"unico"`
    /// for a sole paragraph. Internal dots are preserved (e.g. `1.029`) and
    /// letter suffixes keep their hyphen (e.g. `121-A`).
    pub number: String,
    /// Body text with editorial annotations still inline.
    pub text: String,
    /// Rubric text bound to this element, when one precedes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epigraph: Option<String>,
    /// Full URN including the `!`-prefixed fragment
    /// (e.g. `...!art121_par2_inc4`).
    pub urn: String,
    /// Vigency state; `false` when annotations or strike-through markup mark
    /// the element revoked.
    pub in_force: bool,
    /// `true` when revocation was detected purely from source markup
    /// (strike-through or a trailing `(Revogado…)` annotation).
    pub textually_revoked: bool,
    /// Heading currently in effect at this element's position, per level.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub path: BTreeMap<HierarchyLevel, String>,
    /// Child elements in source order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<LawElement>,
}

impl LawElement {
    /// Construct an element with the given role, number, and body text.
    /// Vigency defaults to in-force; `urn`, `path`, and `children` start
    /// empty and are filled in by the parser.
    pub fn new(kind: ElementKind, number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            number: number.into(),
            text: text.into(),
            epigraph: None,
            urn: String::new(),
            in_force: true,
            textually_revoked: false,
            path: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Last direct child of the given kind, if any.
    pub fn last_of_kind_mut(&mut self, kind: ElementKind) -> Option<&mut LawElement> {
        self.children.iter_mut().rev().find(|c| c.kind == kind)
    }

    /// The deepest last descendant that carries body text, or `self`.
    ///
    /// Continuation lines append here: a continuation after an alínea must
    /// extend the alínea, not the article caput.
    pub fn last_textual_mut(&mut self) -> &mut LawElement {
        let mut node = self;
        loop {
            let descend = node.children.last().is_some_and(|c| c.kind.is_body());
            if !descend {
                return node;
            }
            let idx = node.children.len() - 1;
            node = &mut node.children[idx];
        }
    }

    /// Append `extra` to this element's body text, separated by a space.
    pub fn append_text(&mut self, extra: &str) {
        if self.text.is_empty() {
            self.text = extra.to_string();
        } else {
            self.text.push(' ');
            self.text.push_str(extra);
        }
    }

    /// Mark this element and every descendant as textually revoked.
    pub fn mark_textually_revoked(&mut self) {
        self.textually_revoked = true;
        self.in_force = false;
        for child in &mut self.children {
            child.mark_textually_revoked();
        }
    }
}
