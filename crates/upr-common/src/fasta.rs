//! FASTA record model and rendering
//!
//! UniProt serves FASTA with arbitrary line lengths depending on the
//! endpoint; records are re-wrapped at [`LINE_WIDTH`] columns on output so
//! downstream parsers see a uniform layout.

/// Column width for rendered sequence lines.
pub const LINE_WIDTH: usize = 60;

/// A single FASTA record: header line (without the leading `>`) plus the
/// unwrapped sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// Extract the accession from a UniProt-style header.
    ///
    /// Headers look like `sp|P19338|NUCL_HUMAN Nucleolin OS=Homo sapiens ...`
    /// (or `tr|...` for TrEMBL). Falls back to the first whitespace-delimited
    /// token for non-UniProt headers.
    pub fn accession(&self) -> Option<&str> {
        let first = self.header.split_whitespace().next()?;
        let mut parts = first.split('|');
        match (parts.next(), parts.next()) {
            (Some("sp") | Some("tr"), Some(acc)) if !acc.is_empty() => Some(acc),
            _ => Some(first),
        }
    }

    /// Render as `>header` followed by the sequence wrapped at
    /// [`LINE_WIDTH`] columns, with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.sequence.len() + 8);
        out.push('>');
        out.push_str(&self.header);
        out.push('\n');
        let bytes = self.sequence.as_bytes();
        for chunk in bytes.chunks(LINE_WIDTH) {
            // Sequences are ASCII one-letter codes; chunking on bytes is safe.
            out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
            out.push('\n');
        }
        out
    }
}

/// Parse concatenated FASTA text into records.
///
/// Lines before the first `>` are ignored; blank lines inside a record are
/// skipped. Whitespace within sequence lines is stripped.
pub fn parse(text: &str) -> Vec<FastaRecord> {
    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for line in text.lines() {
        let line = line.trim_end();
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(FastaRecord::new(header, String::new()));
        } else if let Some(record) = current.as_mut() {
            for token in line.split_whitespace() {
                record.sequence.push_str(token);
            }
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    records
}

/// Render a set of records back to FASTA text.
pub fn render_all(records: &[FastaRecord]) -> String {
    records.iter().map(FastaRecord::render).collect()
}
