use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hex color applied to revoked/vetoed placeholder text.
pub const REVOKED_COLOR: &str = "#666666";

fn is_false(v: &bool) -> bool {
    !*v
}

// ---------------------------------------------------------------------------
// TextRun
// ---------------------------------------------------------------------------

/// A contiguous span of text sharing one set of typographic attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            strikethrough: false,
            color: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    /// Strikethrough + gray, the styling of revoked/vetoed placeholders.
    pub fn struck(text: impl Into<String>) -> Self {
        Self {
            strikethrough: true,
            color: Some(REVOKED_COLOR.to_string()),
            ..Self::plain(text)
        }
    }
}

// ---------------------------------------------------------------------------
// PlateBlock
// ---------------------------------------------------------------------------

/// A rich-text paragraph record consumed by the downstream reader.
///
/// `id` is a random UUIDv4 — it is the only non-deterministic field of the
/// output; everything else is reproducible byte-for-byte across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateBlock {
    /// Block type discriminator; always `"p"` for paragraph blocks.
    #[serde(rename = "type")]
    pub block_type: String,
    pub children: Vec<TextRun>,
    pub id: Uuid,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    /// Annotation-stripped concatenation of label + body, used for search.
    pub search_text: String,
    /// Label + body exactly as read from the source, present only when
    /// annotations were split off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texto_original: Option<String>,
    /// The split-off editorial annotations, present only when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anotacoes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<u8>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub revogado: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub vetado: bool,
}

impl PlateBlock {
    /// Construct a block with a fresh random id and the given runs.
    pub fn new(slug: impl Into<String>, children: Vec<TextRun>, search_text: impl Into<String>) -> Self {
        Self {
            block_type: "p".to_string(),
            children,
            id: Uuid::new_v4(),
            slug: slug.into(),
            urn: None,
            search_text: search_text.into(),
            texto_original: None,
            anotacoes: None,
            indent: None,
            revogado: false,
            vetado: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_run_serializes_minimal_fields() {
        let json = serde_json::to_value(TextRun::plain("texto")).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "texto" }));
    }

    #[test]
    fn struck_run_carries_color_and_strikethrough() {
        let run = TextRun::struck("Dispositivo revogado.");
        assert!(run.strikethrough);
        assert_eq!(run.color.as_deref(), Some(REVOKED_COLOR));
    }

    #[test]
    fn block_ids_are_unique_per_construction() {
        let a = PlateBlock::new("artigo-1.caput", vec![], "");
        let b = PlateBlock::new("artigo-1.caput", vec![], "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let block = PlateBlock::new("caput", vec![TextRun::plain("x")], "x");
        let json = serde_json::to_value(&block).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.get("type").unwrap(), "p");
        assert!(!obj.contains_key("urn"));
        assert!(!obj.contains_key("texto_original"));
        assert!(!obj.contains_key("anotacoes"));
        assert!(!obj.contains_key("revogado"));
        assert!(!obj.contains_key("vetado"));
    }
}
