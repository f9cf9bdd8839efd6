//! Artifact writing.
//!
//! One UTF-8 JSON file per import, replaced atomically: the document is
//! serialized to a sibling `.tmp` file and renamed over the destination, so
//! a crash mid-write never leaves a half-written artifact behind.

use std::path::Path;

use lei_core::article::LawDocument;
use lei_core::error::Result;
use log::info;

/// Serialize `document` to `path`, replacing any existing file atomically.
pub fn write_document(document: &LawDocument, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(document)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    std::fs::write(tmp, &bytes)?;
    std::fs::rename(tmp, path)?;
    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lei_core::article::{LawInfo, LawMetadata};
    use lei_core::structure::Estrutura;

    fn document() -> LawDocument {
        LawDocument {
            lei: LawInfo {
                metadata: LawMetadata::new("urn:lex:br:federal:lei:2002-01-10;10406", "Código Civil"),
                hierarquia: Vec::new(),
                estrutura: Estrutura::default(),
            },
            artigos: Vec::new(),
        }
    }

    #[test]
    fn writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lei.json");
        write_document(&document(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["lei"]["nome"], "Código Civil");
        assert!(value["artigos"].as_array().unwrap().is_empty());
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lei.json");
        std::fs::write(&path, "conteúdo antigo").unwrap();

        write_document(&document(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with('{'));
    }

    #[test]
    fn leaves_no_tmp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lei.json");
        write_document(&document(), &path).unwrap();
        assert!(!dir.path().join("lei.json.tmp").exists());
    }
}
