//! Request descriptors and UniProt query construction
//!
//! A [`RequestDescriptor`] captures one invocation: exactly one primary
//! retrieval mode plus the modifiers that shape the query. Validation
//! happens here, before any network call.

use crate::error::{CliError, Result};
use crate::input;
use crate::output::OutputFormat;
use crate::Cli;
use tracing::warn;
use upr_common::ids;

/// Default maximum number of records retrieved.
pub const DEFAULT_LIMIT: usize = 500;

/// Limit used for whole-proteome downloads unless --limit is given.
pub const PROTEOME_LIMIT: usize = 100_000;

/// NCBI taxonomy ID for Homo sapiens.
pub const HUMAN_TAXON_ID: u32 = 9606;

/// The primary retrieval mode. Exactly one is active per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMode {
    /// Explicit accession list, fetched entry by entry
    Ids(Vec<String>),
    /// Gene names, OR-joined into a search query
    Genes(Vec<String>),
    /// Free-text search query, passed through largely verbatim
    Query(String),
    /// Whole proteome by proteome ID
    Proteome(String),
    /// Cross-database ID mapping job
    IdMapping {
        ids: Vec<String>,
        from_db: String,
        to_db: String,
    },
}

impl RequestMode {
    pub fn name(&self) -> &'static str {
        match self {
            RequestMode::Ids(_) => "ids",
            RequestMode::Genes(_) => "genes",
            RequestMode::Query(_) => "query",
            RequestMode::Proteome(_) => "proteome",
            RequestMode::IdMapping { .. } => "id-mapping",
        }
    }
}

/// One retrieval request: mode plus modifiers.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub mode: RequestMode,
    /// Organism filter: name or NCBI taxon ID
    pub organism: Option<String>,
    /// Include unreviewed (TrEMBL) entries; reviewed-only is the default
    pub include_unreviewed: bool,
    /// Maximum number of records to retrieve
    pub limit: usize,
    pub format: OutputFormat,
    /// Contact identifier carried in the User-Agent header
    pub contact: String,
}

impl RequestDescriptor {
    /// Build a descriptor from parsed CLI arguments. `--input` is read
    /// here so the descriptor always carries a concrete accession list.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut modes: Vec<RequestMode> = Vec::new();

        if !cli.mode.ids.is_empty() {
            modes.push(RequestMode::Ids(cli.mode.ids.clone()));
        }
        if let Some(path) = &cli.mode.input {
            modes.push(RequestMode::Ids(input::read_ids(path)?));
        }
        if !cli.mode.genes.is_empty() {
            modes.push(RequestMode::Genes(cli.mode.genes.clone()));
        }
        if let Some(query) = &cli.mode.query {
            modes.push(RequestMode::Query(query.clone()));
        }
        if let Some(proteome) = &cli.mode.proteome {
            modes.push(RequestMode::Proteome(proteome.clone()));
        }
        if !cli.mode.map.is_empty() {
            modes.push(RequestMode::IdMapping {
                ids: cli.mode.map.clone(),
                from_db: cli.from_db.clone(),
                to_db: cli.to_db.clone(),
            });
        }

        // clap already enforces the mode group; re-checked here for
        // library callers.
        if modes.is_empty() {
            return Err(CliError::invalid_request(
                "no retrieval mode selected; pass one of --ids, --input, --genes, --query, --proteome, or --map",
            ));
        }
        if modes.len() > 1 {
            return Err(CliError::invalid_request(
                "multiple retrieval modes selected; exactly one of --ids, --input, --genes, --query, --proteome, or --map is allowed",
            ));
        }
        let mode = modes.remove(0);

        let limit = cli.limit.unwrap_or(match mode {
            RequestMode::Proteome(_) => PROTEOME_LIMIT,
            _ => DEFAULT_LIMIT,
        });

        let descriptor = Self {
            mode,
            organism: cli.organism.clone(),
            include_unreviewed: cli.unreviewed,
            limit,
            format: cli.format,
            contact: cli.email.clone(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Reject invalid descriptors before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(CliError::invalid_request("limit must be greater than zero"));
        }

        match &self.mode {
            RequestMode::Ids(ids) => {
                if ids.is_empty() {
                    return Err(CliError::invalid_request("at least one accession is required"));
                }
                for id in ids {
                    if !ids::is_accession(id) {
                        warn!(id = %id, "Identifier does not look like a UniProt accession");
                    }
                }
            },
            RequestMode::Genes(genes) => {
                if genes.is_empty() {
                    return Err(CliError::invalid_request("at least one gene name is required"));
                }
            },
            RequestMode::Query(query) => {
                if query.trim().is_empty() {
                    return Err(CliError::invalid_request("search query cannot be empty"));
                }
            },
            RequestMode::Proteome(proteome) => {
                if proteome.trim().is_empty() {
                    return Err(CliError::invalid_request("proteome ID is required"));
                }
                if !ids::is_proteome_id(proteome) {
                    warn!(id = %proteome, "Identifier does not look like a proteome ID (expected UP followed by nine digits)");
                }
            },
            RequestMode::IdMapping { ids, from_db, to_db } => {
                if ids.is_empty() {
                    return Err(CliError::invalid_request("at least one ID to map is required"));
                }
                if from_db.trim().is_empty() || to_db.trim().is_empty() {
                    return Err(CliError::invalid_request(
                        "--from-db and --to-db must not be empty",
                    ));
                }
            },
        }

        Ok(())
    }

    /// The UniProt search query for this request, or `None` for modes that
    /// bypass the search endpoint (per-entry fetches and ID mapping).
    pub fn search_query(&self) -> Option<String> {
        let base = match &self.mode {
            RequestMode::Ids(_) | RequestMode::IdMapping { .. } => return None,
            RequestMode::Genes(genes) => or_join("gene", genes),
            RequestMode::Query(query) => query.trim().to_string(),
            RequestMode::Proteome(proteome) => format!("proteome:{proteome}"),
        };
        Some(self.with_filters(base))
    }

    /// Append organism and review-status filters to a base query.
    fn with_filters(&self, base: String) -> String {
        let mut query = base;

        if let Some(organism) = &self.organism {
            query.push_str(" AND ");
            query.push_str(&organism_filter(organism));
        }

        if !self.include_unreviewed {
            query.push_str(" AND reviewed:true");
        }

        query
    }
}

/// OR-join `values` under `field`, parenthesized when there is more than
/// one term so appended AND filters apply to the whole list.
pub fn or_join(field: &str, values: &[String]) -> String {
    let joined = values
        .iter()
        .map(|value| format!("{field}:{value}"))
        .collect::<Vec<_>>()
        .join(" OR ");

    if values.len() > 1 {
        format!("({joined})")
    } else {
        joined
    }
}

/// Translate an organism flag value into UniProt query syntax. Taxon IDs
/// go to `organism_id`; names go to `organism_name`, quoted when they
/// contain whitespace.
fn organism_filter(organism: &str) -> String {
    let trimmed = organism.trim();
    let lower = trimmed.to_lowercase();

    if lower == "human" || lower == "homo sapiens" {
        return format!("organism_id:{HUMAN_TAXON_ID}");
    }

    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return format!("organism_id:{trimmed}");
    }

    if trimmed.contains(char::is_whitespace) {
        format!("organism_name:\"{trimmed}\"")
    } else {
        format!("organism_name:{trimmed}")
    }
}
