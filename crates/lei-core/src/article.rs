use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::HierarchyLevel;
use crate::plate::PlateBlock;
use crate::structure::{Estrutura, HierarchyNode};

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// One emitted article — the unit of the output's `artigos` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Random UUIDv4 assigned at emit time.
    pub id: Uuid,
    /// Canonical number string (`"1"`, `"121-A"`, `"1.029"`).
    pub number: String,
    /// Stable slug, unique within the law (`artigo-121`,
    /// `artigo-121-revogado`).
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epigraph: Option<String>,
    /// Rich-text blocks in reading order: epigraph, caput, then descendants.
    pub plate_content: Vec<PlateBlock>,
    /// Body texts (never epigraphs) in emit order, newline-separated.
    pub texto_plano: String,
    /// Clean label+body concatenation of every block, newline-separated.
    pub search_text: String,
    pub in_force: bool,
    /// Heading chain in effect at this article, outermost level first.
    pub context: Vec<String>,
    /// Same chain keyed by level.
    pub path: BTreeMap<HierarchyLevel, String>,
    /// Deterministic fingerprint of `texto_plano`.
    pub content_hash: String,
    /// Revoked same-numbered variants absorbed by this in-force article.
    #[serde(default)]
    pub revoked_versions: Vec<Article>,
}

// ---------------------------------------------------------------------------
// LawMetadata / LawDocument
// ---------------------------------------------------------------------------

/// Identity of the imported law, as returned by the structured endpoint or
/// synthesized from the alias table for local-HTML imports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawMetadata {
    pub urn: String,
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apelido: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigla: Option<String>,
    /// When this import ran.
    pub importado_em: DateTime<Utc>,
}

impl LawMetadata {
    pub fn new(urn: impl Into<String>, nome: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            nome: nome.into(),
            apelido: None,
            sigla: None,
            importado_em: Utc::now(),
        }
    }
}

/// The `lei` half of the artifact: metadata plus the grouping structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawInfo {
    #[serde(flatten)]
    pub metadata: LawMetadata,
    pub hierarquia: Vec<HierarchyNode>,
    pub estrutura: Estrutura,
}

/// The complete output artifact written by the emitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawDocument {
    pub lei: LawInfo,
    pub artigos: Vec<Article>,
}
