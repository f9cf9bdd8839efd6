//! Ranked selection among the binary-text variants a structured response
//! lists under `encoding[]`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});

/// `additionalType` arrives either as a single string or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn contains(&self, needle: &str) -> bool {
        match self {
            OneOrMany::One(s) => s.contains(needle),
            OneOrMany::Many(v) => v.iter().any(|s| s.contains(needle)),
        }
    }
}

/// One entry of the `encoding[]` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryVariant {
    #[serde(rename = "contentUrl")]
    pub content_url: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "additionalType", default)]
    pub additional_type: Option<OneOrMany>,
}

impl BinaryVariant {
    fn is_current(&self) -> bool {
        self.version.as_deref() == Some("Current")
    }

    fn is_compiled(&self) -> bool {
        self.additional_type
            .as_ref()
            .is_some_and(|t| t.contains("Compilacao") || t.contains("Vigente"))
    }

    fn is_original_publication(&self) -> bool {
        self.additional_type
            .as_ref()
            .is_some_and(|t| t.contains("PublicacaoOriginal"))
    }

    /// The variant UUID embedded in `contentUrl`.
    pub fn uuid(&self) -> Option<String> {
        UUID_RE
            .find(&self.content_url)
            .map(|m| m.as_str().to_lowercase())
    }
}

/// Pick the variant to fetch, by priority: the `Current` version, then a
/// compiled/in-force text, then the original publication, then whatever was
/// listed last.
pub fn select_variant(variants: &[BinaryVariant]) -> Option<&BinaryVariant> {
    variants
        .iter()
        .find(|v| v.is_current())
        .or_else(|| variants.iter().find(|v| v.is_compiled()))
        .or_else(|| variants.iter().find(|v| v.is_original_publication()))
        .or_else(|| variants.last())
}
