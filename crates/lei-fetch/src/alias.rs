//! Alias → URN lookup table.
//!
//! The table is external configuration: a compiled-in set of well-known
//! codes keeps `--lei cp` working out of the box, and a JSON file supplied
//! via `--aliases` extends or overrides it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// One alias table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LawAlias {
    pub urn: String,
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigla: Option<String>,
}

/// Alias lookup table, keyed by lowercase alias.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, LawAlias>,
}

impl AliasTable {
    /// The compiled-in defaults: the federal codes importers ask for most.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        let mut add = |alias: &str, urn: &str, nome: &str, sigla: &str| {
            entries.insert(
                alias.to_string(),
                LawAlias {
                    urn: urn.to_string(),
                    nome: nome.to_string(),
                    sigla: Some(sigla.to_string()),
                },
            );
        };

        add(
            "cp",
            "urn:lex:br:federal:decreto.lei:1940-12-07;2848",
            "Código Penal",
            "CP",
        );
        add(
            "cpp",
            "urn:lex:br:federal:decreto.lei:1941-10-03;3689",
            "Código de Processo Penal",
            "CPP",
        );
        add(
            "cc",
            "urn:lex:br:federal:lei:2002-01-10;10406",
            "Código Civil",
            "CC",
        );
        add(
            "cpc",
            "urn:lex:br:federal:lei:2015-03-16;13105",
            "Código de Processo Civil",
            "CPC",
        );
        add(
            "cdc",
            "urn:lex:br:federal:lei:1990-09-11;8078",
            "Código de Defesa do Consumidor",
            "CDC",
        );
        add(
            "clt",
            "urn:lex:br:federal:decreto.lei:1943-05-01;5452",
            "Consolidação das Leis do Trabalho",
            "CLT",
        );
        add(
            "ctn",
            "urn:lex:br:federal:lei:1966-10-25;5172",
            "Código Tributário Nacional",
            "CTN",
        );
        add(
            "ctb",
            "urn:lex:br:federal:lei:1997-09-23;9503",
            "Código de Trânsito Brasileiro",
            "CTB",
        );
        add(
            "cf",
            "urn:lex:br:federal:constituicao:1988-10-05;1988",
            "Constituição da República Federativa do Brasil",
            "CF",
        );

        Self { entries }
    }

    /// Load a table from a JSON file of `{ "alias": {urn, nome, sigla?} }`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let entries: HashMap<String, LawAlias> = serde_json::from_str(&raw)?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        })
    }

    /// Overlay `other` on top of this table; `other` wins on collisions.
    pub fn merged_with(mut self, other: AliasTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Resolve an alias, case-insensitively.
    pub fn resolve(&self, alias: &str) -> Result<&LawAlias> {
        self.entries
            .get(&alias.to_lowercase())
            .ok_or_else(|| FetchError::UnknownAlias(alias.to_string()))
    }

    /// Best-effort reverse lookup by URN, used to synthesize metadata for
    /// local-HTML imports.
    pub fn find_by_urn(&self, urn: &str) -> Option<&LawAlias> {
        self.entries.values().find(|a| a.urn == urn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_known_codes() {
        let table = AliasTable::builtin();
        let cp = table.resolve("cp").unwrap();
        assert!(cp.urn.contains("decreto.lei:1940-12-07;2848"));
        assert_eq!(cp.nome, "Código Penal");
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let table = AliasTable::builtin();
        assert!(table.resolve("CLT").is_ok());
    }

    #[test]
    fn unknown_alias_is_an_error() {
        let table = AliasTable::builtin();
        assert!(matches!(
            table.resolve("nope"),
            Err(FetchError::UnknownAlias(_))
        ));
    }

    #[test]
    fn file_table_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        std::fs::write(
            &path,
            r#"{ "cp": { "urn": "urn:lex:br:federal:lei:2099;1", "nome": "Outro" } }"#,
        )
        .unwrap();

        let table = AliasTable::builtin().merged_with(AliasTable::from_file(&path).unwrap());
        assert_eq!(table.resolve("cp").unwrap().nome, "Outro");
        // Untouched entries survive the merge.
        assert!(table.resolve("cc").is_ok());
    }

    #[test]
    fn reverse_lookup_by_urn() {
        let table = AliasTable::builtin();
        let hit = table.find_by_urn("urn:lex:br:federal:lei:2002-01-10;10406");
        assert_eq!(hit.unwrap().sigla.as_deref(), Some("CC"));
    }
}
