//! Output formats and record accumulation
//!
//! Each UniProt response body is split into individual records so the
//! retriever can count against the configured limit and merge pages (or
//! per-accession fetches) into one coherent output document:
//!
//! - FASTA: records re-rendered with sequences wrapped at 60 columns
//! - JSON: `results` arrays merged into a single `{"results": [...]}`
//! - TSV: first header row kept, repeated headers dropped
//! - XML: `<entry>` elements re-wrapped in the first page's envelope

use crate::error::{CliError, Result};
use clap::ValueEnum;
use serde_json::Value;
use std::fs;
use std::path::Path;
use upr_common::fasta::{self, FastaRecord};

/// Column projection requested for TSV output.
pub const TSV_FIELDS: &str = "accession,gene_names,organism_name,length,sequence";

/// Supported output formats, as offered by the UniProt REST API.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Fasta,
    Json,
    Tsv,
    Xml,
}

impl OutputFormat {
    /// Format name as the API expects it in URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Fasta => "fasta",
            OutputFormat::Json => "json",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Xml => "xml",
        }
    }

    /// The field projection to request, for formats that need one
    pub fn tsv_fields(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Tsv => Some(TSV_FIELDS),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format-specific record accumulator.
///
/// Pages and per-accession payloads are absorbed one at a time; `render`
/// produces the final document.
#[derive(Debug)]
pub enum RecordBuffer {
    Fasta(Vec<FastaRecord>),
    Json(Vec<Value>),
    Tsv {
        header: Option<String>,
        rows: Vec<String>,
    },
    Xml {
        /// Document text before the first `<entry>` and after the last
        /// `</entry>` of the first page that carried entries.
        envelope: Option<(String, String)>,
        entries: Vec<String>,
    },
}

impl RecordBuffer {
    pub fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Fasta => RecordBuffer::Fasta(Vec::new()),
            OutputFormat::Json => RecordBuffer::Json(Vec::new()),
            OutputFormat::Tsv => RecordBuffer::Tsv {
                header: None,
                rows: Vec::new(),
            },
            OutputFormat::Xml => RecordBuffer::Xml {
                envelope: None,
                entries: Vec::new(),
            },
        }
    }

    /// Number of records accumulated so far
    pub fn len(&self) -> usize {
        match self {
            RecordBuffer::Fasta(records) => records.len(),
            RecordBuffer::Json(entries) => entries.len(),
            RecordBuffer::Tsv { rows, .. } => rows.len(),
            RecordBuffer::Xml { entries, .. } => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split a response body into records and absorb them. Returns the
    /// number of records added.
    pub fn absorb(&mut self, body: &str) -> Result<usize> {
        match self {
            RecordBuffer::Fasta(records) => {
                let parsed = fasta::parse(body);
                let added = parsed.len();
                records.extend(parsed);
                Ok(added)
            },
            RecordBuffer::Json(entries) => {
                let value: Value = serde_json::from_str(body)
                    .map_err(|e| CliError::malformed(format!("JSON payload: {e}")))?;
                match value {
                    Value::Object(mut map) if map.contains_key("results") => {
                        match map.remove("results") {
                            Some(Value::Array(results)) => {
                                let added = results.len();
                                entries.extend(results);
                                Ok(added)
                            },
                            _ => Err(CliError::malformed(
                                "JSON payload: 'results' is not an array".to_string(),
                            )),
                        }
                    },
                    // Entry-by-accession responses are a single object.
                    value => {
                        entries.push(value);
                        Ok(1)
                    },
                }
            },
            RecordBuffer::Tsv { header, rows } => {
                let mut lines = body.lines().filter(|line| !line.trim().is_empty());
                let Some(first) = lines.next() else {
                    return Ok(0);
                };
                if header.is_none() {
                    *header = Some(first.to_string());
                }
                let before = rows.len();
                rows.extend(lines.map(str::to_string));
                Ok(rows.len() - before)
            },
            RecordBuffer::Xml { envelope, entries } => {
                let (prefix, found, suffix) = split_xml_entries(body);
                if envelope.is_none() && !found.is_empty() {
                    *envelope = Some((prefix, suffix));
                }
                let added = found.len();
                entries.extend(found);
                Ok(added)
            },
        }
    }

    /// Drop records beyond `limit`. Returns the number discarded.
    pub fn truncate(&mut self, limit: usize) -> usize {
        let over = self.len().saturating_sub(limit);
        if over > 0 {
            match self {
                RecordBuffer::Fasta(records) => records.truncate(limit),
                RecordBuffer::Json(entries) => entries.truncate(limit),
                RecordBuffer::Tsv { rows, .. } => rows.truncate(limit),
                RecordBuffer::Xml { entries, .. } => entries.truncate(limit),
            }
        }
        over
    }

    /// Render the accumulated records as one output document.
    pub fn render(&self) -> Result<String> {
        match self {
            RecordBuffer::Fasta(records) => Ok(fasta::render_all(records)),
            RecordBuffer::Json(entries) => {
                let doc = serde_json::json!({ "results": entries });
                let mut out = serde_json::to_string_pretty(&doc)?;
                out.push('\n');
                Ok(out)
            },
            RecordBuffer::Tsv { header, rows } => {
                let mut out = String::new();
                if let Some(header) = header {
                    out.push_str(header);
                    out.push('\n');
                }
                for row in rows {
                    out.push_str(row);
                    out.push('\n');
                }
                Ok(out)
            },
            RecordBuffer::Xml { envelope, entries } => match envelope {
                Some((prefix, suffix)) => {
                    let mut out = String::with_capacity(
                        prefix.len() + suffix.len() + entries.iter().map(String::len).sum::<usize>(),
                    );
                    out.push_str(prefix);
                    out.push_str(&entries.join("\n"));
                    out.push_str(suffix);
                    Ok(out)
                },
                None => Ok(entries.join("\n")),
            },
        }
    }
}

/// Write the accumulated records to `path`.
pub fn write_output(path: &Path, buffer: &RecordBuffer) -> Result<()> {
    let content = buffer.render()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    Ok(())
}

/// Split an XML document into (prefix, `<entry>…</entry>` elements, suffix).
///
/// A plain scanner is enough here: entry boundaries are top-level in every
/// UniProt XML document and the payload is otherwise passed through
/// untouched.
fn split_xml_entries(body: &str) -> (String, Vec<String>, String) {
    const CLOSE: &str = "</entry>";

    let mut entries = Vec::new();
    let Some(first) = find_entry_start(body, 0) else {
        return (body.to_string(), entries, String::new());
    };

    let prefix = body[..first].to_string();
    let mut cursor = first;

    while let Some(start) = find_entry_start(body, cursor) {
        let Some(end_rel) = body[start..].find(CLOSE) else {
            break;
        };
        let end = start + end_rel + CLOSE.len();
        entries.push(body[start..end].to_string());
        cursor = end;
    }

    (prefix, entries, body[cursor..].to_string())
}

/// Find the next `<entry>` or `<entry …>` open tag at or after `from`,
/// skipping longer tag names that share the prefix.
fn find_entry_start(body: &str, from: usize) -> Option<usize> {
    const OPEN: &str = "<entry";

    let mut idx = from;
    while let Some(pos) = body[idx..].find(OPEN) {
        let abs = idx + pos;
        match body.as_bytes().get(abs + OPEN.len()) {
            Some(b' ') | Some(b'>') | Some(b'\t') | Some(b'\r') | Some(b'\n') => return Some(abs),
            _ => idx = abs + OPEN.len(),
        }
    }
    None
}
