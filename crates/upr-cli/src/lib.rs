//! UPR CLI Library
//!
//! Command-line retrieval of protein sequences and annotations from the
//! UniProt REST API.
//!
//! # Overview
//!
//! One invocation selects exactly one retrieval mode:
//!
//! - **Accessions**: fetch entries by UniProt ID (`--ids`, `--input`)
//! - **Gene names**: search by gene symbol (`--genes`)
//! - **Free-text query**: UniProt query syntax passed through (`--query`)
//! - **Proteome**: download a whole proteome (`--proteome`)
//! - **ID mapping**: map identifiers between databases (`--map`)
//!
//! Results are written to a local file as FASTA, JSON, TSV, or XML.
//! Requests are issued sequentially with bounded retry and exponential
//! backoff; multi-page result sets are followed via the API's `Link`
//! headers up to the configured limit.

pub mod api;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;
pub mod request;
pub mod retrieve;

// Re-export commonly used types
pub use error::{CliError, Result};
pub use output::OutputFormat;
pub use request::{RequestDescriptor, RequestMode};
pub use retrieve::{RetrievalSummary, Retriever};

use crate::api::client::DEFAULT_BASE_URL;
use clap::{Args, Parser};
use std::path::PathBuf;

/// UPR - UniProt Protein Retriever
#[derive(Parser, Debug)]
#[command(name = "upr")]
#[command(author, version)]
#[command(about = "Retrieve protein sequences and annotations from UniProt")]
pub struct Cli {
    /// Primary retrieval mode
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Organism filter: name or NCBI taxon ID (e.g. "human", 9606)
    #[arg(long, value_name = "ORGANISM")]
    pub organism: Option<String>,

    /// Include unreviewed (TrEMBL) entries; default is reviewed-only
    #[arg(long)]
    pub unreviewed: bool,

    /// Maximum number of results (default: 500, or the whole proteome for
    /// --proteome)
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Fasta)]
    pub format: OutputFormat,

    /// Output file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Contact email attached to API requests
    #[arg(long, value_name = "EMAIL", default_value = "user@example.com")]
    pub email: String,

    /// Source database for --map
    #[arg(long, value_name = "DB", default_value = "UniProtKB_AC-ID")]
    pub from_db: String,

    /// Target database for --map
    #[arg(long, value_name = "DB", default_value = "UniProtKB")]
    pub to_db: String,

    /// UniProt REST service root
    #[arg(long, env = "UPR_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Primary retrieval modes; exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ModeArgs {
    /// UniProt accession(s)
    #[arg(long, num_args = 1.., value_name = "ACCESSION")]
    pub ids: Vec<String>,

    /// File containing UniProt accessions (one per line, '#' comments)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Gene name(s)
    #[arg(long, num_args = 1.., value_name = "GENE")]
    pub genes: Vec<String>,

    /// Custom UniProt search query
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Proteome ID (e.g. UP000005640)
    #[arg(long, value_name = "UPID")]
    pub proteome: Option<String>,

    /// IDs to map between databases (see --from-db and --to-db)
    #[arg(long, num_args = 1.., value_name = "ID")]
    pub map: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_mode() {
        let cli = Cli::try_parse_from([
            "upr", "--ids", "P19338", "P09651", "--output", "out.fasta",
        ])
        .unwrap();

        let descriptor = RequestDescriptor::from_cli(&cli).unwrap();
        assert_eq!(
            descriptor.mode,
            RequestMode::Ids(vec!["P19338".to_string(), "P09651".to_string()])
        );
        assert_eq!(descriptor.limit, 500);
        assert_eq!(descriptor.format, OutputFormat::Fasta);
        assert!(!descriptor.include_unreviewed);
    }

    #[test]
    fn test_parse_genes_with_filters() {
        let cli = Cli::try_parse_from([
            "upr",
            "--genes",
            "NUCL",
            "FUS",
            "--organism",
            "human",
            "--unreviewed",
            "--format",
            "tsv",
            "--limit",
            "10",
            "-o",
            "out.tsv",
        ])
        .unwrap();

        let descriptor = RequestDescriptor::from_cli(&cli).unwrap();
        assert!(matches!(descriptor.mode, RequestMode::Genes(_)));
        assert_eq!(descriptor.organism.as_deref(), Some("human"));
        assert!(descriptor.include_unreviewed);
        assert_eq!(descriptor.limit, 10);
        assert_eq!(descriptor.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_proteome_mode_raises_default_limit() {
        let cli = Cli::try_parse_from([
            "upr",
            "--proteome",
            "UP000005640",
            "-o",
            "proteome.fasta",
        ])
        .unwrap();

        let descriptor = RequestDescriptor::from_cli(&cli).unwrap();
        assert_eq!(descriptor.limit, crate::request::PROTEOME_LIMIT);
    }

    #[test]
    fn test_map_mode_carries_databases() {
        let cli = Cli::try_parse_from([
            "upr",
            "--map",
            "ENSG00000115053",
            "--from-db",
            "Ensembl",
            "-o",
            "mapped.fasta",
        ])
        .unwrap();

        let descriptor = RequestDescriptor::from_cli(&cli).unwrap();
        match descriptor.mode {
            RequestMode::IdMapping { ids, from_db, to_db } => {
                assert_eq!(ids, vec!["ENSG00000115053".to_string()]);
                assert_eq!(from_db, "Ensembl");
                assert_eq!(to_db, "UniProtKB");
            },
            other => panic!("expected IdMapping mode, got {other:?}"),
        }
    }

    #[test]
    fn test_modes_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "upr", "--ids", "P19338", "--query", "insulin", "-o", "out.fasta",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_a_mode_is_required() {
        let result = Cli::try_parse_from(["upr", "-o", "out.fasta"]);
        assert!(result.is_err());
    }
}
