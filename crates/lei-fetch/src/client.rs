//! Acquisition client.
//!
//! Resolves a URN to either the structured JSON document (when the endpoint
//! returns a `hasPart` tree) or, failing that, the HTML text of the
//! best-ranked binary variant.

use std::path::Path;
use std::time::Duration;

use lei_core::article::LawMetadata;
use log::{info, warn};
use serde_json::Value;
use url::Url;

use crate::alias::AliasTable;
use crate::cache::FileCache;
use crate::encoding::decode_text;
use crate::error::{FetchError, Result};
use crate::variant::{select_variant, BinaryVariant};

/// Default API root for the structured and binary endpoints.
pub const DEFAULT_BASE_URL: &str = "https://normas.leg.br/api";

// ---------------------------------------------------------------------------
// Acquired payload
// ---------------------------------------------------------------------------

/// What acquisition produced for one law.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub payload: Payload,
    pub metadata: LawMetadata,
}

/// The two source shapes the parser selector dispatches on.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Structured document carrying a `hasPart` tree.
    Json(Value),
    /// Raw HTML of a binary-text variant (or a local file).
    Html(String),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Json(_) => "json",
            Payload::Html(_) => "html",
        }
    }
}

// ---------------------------------------------------------------------------
// LawFetcher
// ---------------------------------------------------------------------------

/// Blocking HTTP client over the two law endpoints.
pub struct LawFetcher {
    base: Url,
    client: reqwest::blocking::Client,
    aliases: AliasTable,
    cache: Option<FileCache>,
}

impl LawFetcher {
    pub fn new(base_url: &str, aliases: AliasTable, cache: Option<FileCache>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        // A trailing slash keeps Url::join from replacing the last path
        // segment of the API root.
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base: Url::parse(&base)?,
            client,
            aliases,
            cache,
        })
    }

    /// Fetch `urn`, preferring the structured document and falling back to
    /// the ranked HTML variant.
    pub fn fetch(&self, urn: &str) -> Result<Acquired> {
        let structured = self.fetch_structured(urn)?;
        let metadata = self.metadata_from_structured(urn, &structured);

        if structured.get("hasPart").is_some() {
            info!("structured document available for {urn}");
            return Ok(Acquired {
                payload: Payload::Json(structured),
                metadata,
            });
        }

        let html = self.fetch_best_variant(urn, &structured)?;
        Ok(Acquired {
            payload: Payload::Html(html),
            metadata,
        })
    }

    /// Build an [`Acquired`] from HTML already on disk, bypassing the
    /// network. Metadata is synthesized from the alias table, best-effort.
    pub fn from_local_html(&self, path: &Path, urn: &str) -> Result<Acquired> {
        info!("reading local html from {}", path.display());
        let bytes = std::fs::read(path)?;
        let html = decode_text(&bytes)?;
        Ok(Acquired {
            payload: Payload::Html(html),
            metadata: self.synthesize_metadata(urn),
        })
    }

    /// Resolve an alias through the table.
    pub fn resolve_alias(&self, alias: &str) -> Result<String> {
        Ok(self.aliases.resolve(alias)?.urn.clone())
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn fetch_structured(&self, urn: &str) -> Result<Value> {
        if let Some(bytes) = self.cache.as_ref().and_then(|c| c.get(urn, "json")) {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let mut endpoint = self.base.join("normas")?;
        endpoint
            .query_pairs_mut()
            .append_pair("urn", urn)
            .append_pair("tipo_documento", "maior-detalhe");
        info!("GET {endpoint}");

        let response = self.client.get(endpoint.clone()).send()?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(FetchError::NotFound(urn.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: endpoint.to_string(),
            });
        }

        let bytes = response.bytes()?;
        let value: Value = serde_json::from_slice(&bytes)?;
        if let Some(cache) = &self.cache {
            cache.put(urn, "json", &bytes)?;
        }
        Ok(value)
    }

    fn fetch_best_variant(&self, urn: &str, structured: &Value) -> Result<String> {
        if let Some(bytes) = self.cache.as_ref().and_then(|c| c.get(urn, "html")) {
            return decode_text(&bytes);
        }

        let variants: Vec<BinaryVariant> = match structured.get("encoding") {
            Some(list) => serde_json::from_value(list.clone())?,
            None => Vec::new(),
        };
        let chosen = select_variant(&variants)
            .ok_or_else(|| FetchError::NoVariantAvailable(urn.to_string()))?;
        let uuid = chosen
            .uuid()
            .ok_or_else(|| FetchError::Malformed(format!("no uuid in {}", chosen.content_url)))?;

        let endpoint = self.base.join(&format!("binario/{uuid}/texto"))?;
        info!("GET {endpoint}");

        let response = self.client.get(endpoint.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: endpoint.to_string(),
            });
        }

        let bytes = response.bytes()?;
        let html = decode_text(&bytes)?;
        if let Some(cache) = &self.cache {
            cache.put(urn, "html", &bytes)?;
        }
        Ok(html)
    }

    fn metadata_from_structured(&self, urn: &str, doc: &Value) -> LawMetadata {
        let nome = doc
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.aliases.find_by_urn(urn).map(|a| a.nome.clone()))
            .unwrap_or_else(|| urn.to_string());

        let mut metadata = LawMetadata::new(urn, nome);
        metadata.apelido = doc
            .get("alternateName")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(alias) = self.aliases.find_by_urn(urn) {
            metadata.sigla = alias.sigla.clone();
        }
        metadata
    }

    fn synthesize_metadata(&self, urn: &str) -> LawMetadata {
        match self.aliases.find_by_urn(urn) {
            Some(alias) => {
                let mut m = LawMetadata::new(urn, alias.nome.clone());
                m.sigla = alias.sigla.clone();
                m
            }
            None => {
                warn!("no alias entry for {urn}; metadata will be minimal");
                LawMetadata::new(urn, urn)
            }
        }
    }
}
