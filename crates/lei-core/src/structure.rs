use serde::{Deserialize, Serialize};

use crate::element::{HierarchyLevel, LawElement};

// ---------------------------------------------------------------------------
// HierarchyNode
// ---------------------------------------------------------------------------

/// A node of the nested hierarchy tree: one grouping heading and the headings
/// nested under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub nivel: HierarchyLevel,
    pub titulo: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub filhos: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(nivel: HierarchyLevel, titulo: impl Into<String>) -> Self {
        Self {
            nivel,
            titulo: titulo.into(),
            filhos: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Estrutura
// ---------------------------------------------------------------------------

/// Flat ordered heading lists per grouping level, plus the bin of orphan
/// texts the parsers could not attach anywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Estrutura {
    pub partes: Vec<String>,
    pub livros: Vec<String>,
    pub titulos: Vec<String>,
    pub subtitulos: Vec<String>,
    pub capitulos: Vec<String>,
    pub secoes: Vec<String>,
    pub subsecoes: Vec<String>,
    pub textos_orfaos: Vec<String>,
}

impl Estrutura {
    /// The flat list for `level`.
    pub fn list(&self, level: HierarchyLevel) -> &Vec<String> {
        match level {
            HierarchyLevel::Parte => &self.partes,
            HierarchyLevel::Livro => &self.livros,
            HierarchyLevel::Titulo => &self.titulos,
            HierarchyLevel::Subtitulo => &self.subtitulos,
            HierarchyLevel::Capitulo => &self.capitulos,
            HierarchyLevel::Secao => &self.secoes,
            HierarchyLevel::Subsecao => &self.subsecoes,
        }
    }

    fn list_mut(&mut self, level: HierarchyLevel) -> &mut Vec<String> {
        match level {
            HierarchyLevel::Parte => &mut self.partes,
            HierarchyLevel::Livro => &mut self.livros,
            HierarchyLevel::Titulo => &mut self.titulos,
            HierarchyLevel::Subtitulo => &mut self.subtitulos,
            HierarchyLevel::Capitulo => &mut self.capitulos,
            HierarchyLevel::Secao => &mut self.secoes,
            HierarchyLevel::Subsecao => &mut self.subsecoes,
        }
    }
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

/// Ordered heading sequences per level plus the nested hierarchy tree.
///
/// Parsers call [`Structure::open`] each time a grouping heading takes
/// effect; the cursor tracks the currently open node per level so a new
/// heading at level L closes everything deeper than L.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub flat: Estrutura,
    pub hierarquia: Vec<HierarchyNode>,
    /// Open node per depth: `(level, index into the parent's child list)`.
    cursor: Vec<(HierarchyLevel, usize)>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `heading` as the heading now in effect at `level`.
    ///
    /// Appends to the flat list for `level`, closes any open node at `level`
    /// or deeper, and attaches a new tree node under the deepest still-open
    /// ancestor (or at the root when none is open).
    pub fn open(&mut self, level: HierarchyLevel, heading: impl Into<String>) {
        let heading = heading.into();
        self.flat.list_mut(level).push(heading.clone());

        while matches!(self.cursor.last(), Some((l, _)) if *l >= level) {
            self.cursor.pop();
        }

        let node = HierarchyNode::new(level, heading);
        let siblings = self.open_children_mut();
        siblings.push(node);
        let idx = siblings.len() - 1;
        self.cursor.push((level, idx));
    }

    /// Amend the most recently opened heading (pending-description pattern:
    /// the descriptive line arrives on the block after the header line).
    pub fn amend_last(&mut self, level: HierarchyLevel, full_heading: &str) {
        if let Some(last) = self.flat.list_mut(level).last_mut() {
            *last = full_heading.to_string();
        }
        if let Some(node) = self.open_node_mut() {
            if node.nivel == level {
                node.titulo = full_heading.to_string();
            }
        }
    }

    /// Record a text the parser could not attach to any element.
    pub fn orphan(&mut self, text: impl Into<String>) {
        self.flat.textos_orfaos.push(text.into());
    }

    /// `true` when no heading has been recorded at `level` yet.
    pub fn is_empty_at(&self, level: HierarchyLevel) -> bool {
        self.flat.list(level).is_empty()
    }

    fn open_node_mut(&mut self) -> Option<&mut HierarchyNode> {
        let mut path = self.cursor.iter();
        let (_, first) = path.next()?;
        let mut node = &mut self.hierarquia[*first];
        for (_, idx) in path {
            node = &mut node.filhos[*idx];
        }
        Some(node)
    }

    fn open_children_mut(&mut self) -> &mut Vec<HierarchyNode> {
        let mut nodes = &mut self.hierarquia;
        for (_, idx) in &self.cursor {
            nodes = &mut nodes[*idx].filhos;
        }
        nodes
    }
}

// ---------------------------------------------------------------------------
// ParsedLaw
// ---------------------------------------------------------------------------

/// The parser → emitter handoff: the article trees plus the grouping
/// structure observed while walking the source.
#[derive(Debug, Clone, Default)]
pub struct ParsedLaw {
    pub articles: Vec<LawElement>,
    pub structure: Structure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_builds_flat_lists_in_order() {
        let mut s = Structure::new();
        s.open(HierarchyLevel::Titulo, "TÍTULO I - Dos Crimes Contra a Pessoa");
        s.open(HierarchyLevel::Capitulo, "CAPÍTULO I - Dos Crimes Contra a Vida");
        s.open(HierarchyLevel::Capitulo, "CAPÍTULO II - Das Lesões Corporais");
        assert_eq!(s.flat.titulos.len(), 1);
        assert_eq!(
            s.flat.capitulos,
            vec![
                "CAPÍTULO I - Dos Crimes Contra a Vida",
                "CAPÍTULO II - Das Lesões Corporais"
            ]
        );
    }

    #[test]
    fn tree_nests_deeper_levels_under_open_ancestor() {
        let mut s = Structure::new();
        s.open(HierarchyLevel::Parte, "Parte geral");
        s.open(HierarchyLevel::Titulo, "TÍTULO I");
        s.open(HierarchyLevel::Capitulo, "CAPÍTULO I");
        s.open(HierarchyLevel::Titulo, "TÍTULO II");

        assert_eq!(s.hierarquia.len(), 1);
        let parte = &s.hierarquia[0];
        assert_eq!(parte.filhos.len(), 2);
        assert_eq!(parte.filhos[0].titulo, "TÍTULO I");
        assert_eq!(parte.filhos[0].filhos[0].titulo, "CAPÍTULO I");
        assert_eq!(parte.filhos[1].titulo, "TÍTULO II");
        assert!(parte.filhos[1].filhos.is_empty());
    }

    #[test]
    fn sibling_at_same_level_closes_previous_node() {
        let mut s = Structure::new();
        s.open(HierarchyLevel::Capitulo, "CAPÍTULO I");
        s.open(HierarchyLevel::Secao, "Seção I");
        s.open(HierarchyLevel::Secao, "Seção II");
        assert_eq!(s.hierarquia[0].filhos.len(), 2);
    }

    #[test]
    fn amend_last_rewrites_flat_and_tree() {
        let mut s = Structure::new();
        s.open(HierarchyLevel::Titulo, "TÍTULO I");
        s.amend_last(HierarchyLevel::Titulo, "TÍTULO I - Da Aplicação da Lei Penal");
        assert_eq!(s.flat.titulos[0], "TÍTULO I - Da Aplicação da Lei Penal");
        assert_eq!(s.hierarquia[0].titulo, "TÍTULO I - Da Aplicação da Lei Penal");
    }

    #[test]
    fn orphan_texts_accumulate() {
        let mut s = Structure::new();
        s.orphan("O PRESIDENTE DA REPÚBLICA");
        assert_eq!(s.flat.textos_orfaos.len(), 1);
    }
}
