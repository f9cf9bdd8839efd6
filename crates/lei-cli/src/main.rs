//! `lei-importer` — import a Brazilian federal law into structured JSON.
//!
//! Resolves a URN (or an alias like `cp`), acquires the structured document
//! or the ranked HTML variant, parses, emits, and writes one JSON artifact.
//! Exit code 0 on success, 1 on any fatal error; diagnostics go to stderr
//! via `env_logger`, the report to stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lei_emit::{emit, write_document, EmitReport};
use lei_fetch::{AliasTable, FileCache, LawFetcher, Payload, DEFAULT_BASE_URL};
use lei_parse::{parse_html, parse_structured};
use log::info;

/// Importador de leis federais: URN ou apelido → JSON estruturado.
#[derive(Parser, Debug)]
#[command(name = "lei-importer", version)]
#[command(group(clap::ArgGroup::new("source").required(true)))]
struct Args {
    /// Full URN of the law (e.g. urn:lex:br:federal:lei:2002-01-10;10406)
    #[arg(long, group = "source")]
    urn: Option<String>,

    /// Alias from the alias table (e.g. cp, cc, clt)
    #[arg(long = "lei", group = "source")]
    alias: Option<String>,

    /// Output path for the JSON artifact
    #[arg(short, long, default_value = "lei.json")]
    output: PathBuf,

    /// Parse a local HTML file instead of fetching from the network
    #[arg(long)]
    planalto_html: Option<PathBuf>,

    /// JSON file extending/overriding the built-in alias table
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Directory for cached payloads, keyed by URN
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// API root for the structured and binary endpoints
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn main() -> Result<()> {
    env_logger::init();
    // Argument errors are fatal like everything else: exit 1, not clap's 2.
    let args = Args::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        std::process::exit(1);
    });

    let mut aliases = AliasTable::builtin();
    if let Some(path) = &args.aliases {
        let extra = AliasTable::from_file(path)
            .with_context(|| format!("loading alias table {}", path.display()))?;
        aliases = aliases.merged_with(extra);
    }

    let cache = match &args.cache_dir {
        Some(dir) => Some(FileCache::new(dir)?),
        None => None,
    };
    let fetcher = LawFetcher::new(&args.base_url, aliases, cache)?;

    let urn = match (&args.urn, &args.alias) {
        (Some(urn), _) => urn.clone(),
        (None, Some(alias)) => fetcher.resolve_alias(alias)?,
        (None, None) => bail!("either --urn or --lei is required"),
    };
    info!("importing {urn}");

    let acquired = match &args.planalto_html {
        Some(path) => fetcher.from_local_html(path, &urn)?,
        None => fetcher.fetch(&urn)?,
    };

    let parsed = match &acquired.payload {
        Payload::Json(doc) => parse_structured(doc)?,
        Payload::Html(html) => parse_html(html, &urn)?,
    };

    let (document, report) = emit(parsed, acquired.metadata);
    write_document(&document, &args.output)?;

    print_report(&document, &report, &args.output);
    Ok(())
}

fn print_report(document: &lei_core::article::LawDocument, report: &EmitReport, output: &PathBuf) {
    println!("{}", document.lei.metadata.nome);
    println!("  urn:       {}", document.lei.metadata.urn);
    println!("  artigos:   {}", report.articles);
    println!(
        "  estrutura: {} partes, {} livros, {} títulos, {} capítulos, {} seções",
        document.lei.estrutura.partes.len(),
        document.lei.estrutura.livros.len(),
        document.lei.estrutura.titulos.len(),
        document.lei.estrutura.capitulos.len(),
        document.lei.estrutura.secoes.len(),
    );
    if report.revoked_merged > 0 {
        println!("  versões revogadas incorporadas: {}", report.revoked_merged);
    }
    if report.urn_slug_mismatches > 0 {
        println!("  divergências urn/slug: {}", report.urn_slug_mismatches);
    }
    println!("  saída:     {}", output.display());
}
