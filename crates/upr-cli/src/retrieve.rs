//! Retrieval orchestration
//!
//! Dispatches a validated [`RequestDescriptor`] to the right fetch
//! strategy, accumulates records, applies the result limit, and writes the
//! output file. Requests run strictly sequentially.

use crate::api::UniProtClient;
use crate::error::{CliError, Result};
use crate::output::{self, RecordBuffer};
use crate::progress;
use crate::request::{RequestDescriptor, RequestMode};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of one retrieval run.
#[derive(Debug, Default)]
pub struct RetrievalSummary {
    /// Records written to the output file
    pub retrieved: usize,
    /// Entries that failed permanently and were skipped
    pub failed: usize,
    /// The identifiers behind `failed`
    pub failed_ids: Vec<String>,
    /// Records discarded because the limit was reached
    pub truncated: usize,
    /// Whether pagination stopped early on a permanent failure
    pub partial: bool,
}

/// Executes retrieval requests against the UniProt API.
pub struct Retriever {
    client: UniProtClient,
}

impl Retriever {
    pub fn new(client: UniProtClient) -> Self {
        Self { client }
    }

    /// Run one retrieval: fetch, accumulate, truncate to the limit, write.
    pub async fn run(
        &self,
        descriptor: &RequestDescriptor,
        output_path: &Path,
    ) -> Result<RetrievalSummary> {
        descriptor.validate()?;

        info!(
            mode = descriptor.mode.name(),
            format = %descriptor.format,
            limit = descriptor.limit,
            "Starting retrieval"
        );

        let mut buffer = RecordBuffer::new(descriptor.format);
        let mut summary = RetrievalSummary::default();

        match &descriptor.mode {
            RequestMode::Ids(ids) => {
                self.fetch_ids(ids, descriptor, &mut buffer, &mut summary)
                    .await?;
            },
            RequestMode::IdMapping { ids, from_db, to_db } => {
                let spinner = progress::create_spinner("Mapping IDs...");
                let result = self
                    .client
                    .map_ids(ids, from_db, to_db, descriptor.format)
                    .await;
                spinner.finish_and_clear();
                buffer.absorb(&result?)?;
            },
            _ => {
                self.fetch_search(descriptor, &mut buffer, &mut summary)
                    .await?;
            },
        }

        summary.truncated = buffer.truncate(descriptor.limit);
        if summary.truncated > 0 {
            info!(
                discarded = summary.truncated,
                limit = descriptor.limit,
                "Result limit reached, excess records discarded"
            );
        }
        summary.retrieved = buffer.len();

        if buffer.is_empty() {
            warn!("No records matched the request");
        }

        output::write_output(output_path, &buffer)?;

        info!(
            retrieved = summary.retrieved,
            failed = summary.failed,
            output = %output_path.display(),
            "Retrieval complete"
        );

        Ok(summary)
    }

    /// Fetch an explicit accession list, entry by entry. A permanently
    /// failed entry is logged and skipped; the batch continues. The run
    /// only fails when nothing succeeded.
    async fn fetch_ids(
        &self,
        ids: &[String],
        descriptor: &RequestDescriptor,
        buffer: &mut RecordBuffer,
        summary: &mut RetrievalSummary,
    ) -> Result<()> {
        info!(count = ids.len(), "Retrieving entries by accession");

        let pb = progress::create_entry_progress(ids.len() as u64, "Fetching UniProt entries");
        let mut last_error: Option<CliError> = None;

        for id in ids {
            let result = match self.client.fetch_entry(id, descriptor.format).await {
                Ok(body) => buffer.absorb(&body),
                Err(err) => Err(err),
            };

            match result {
                Ok(added) => {
                    debug!(accession = %id, records = added, "Entry absorbed");
                },
                Err(err) => {
                    warn!(accession = %id, error = %err, "Entry failed, skipping");
                    summary.failed += 1;
                    summary.failed_ids.push(id.clone());
                    last_error = Some(err);
                },
            }
            pb.inc(1);
        }

        pb.finish_and_clear();

        if buffer.is_empty() {
            if let Some(err) = last_error {
                return Err(err);
            }
        }

        Ok(())
    }

    /// Run a paginated search, following `Link` headers until the limit is
    /// reached or no continuation remains. A permanent failure after the
    /// first page keeps what was accumulated and marks the run partial.
    async fn fetch_search(
        &self,
        descriptor: &RequestDescriptor,
        buffer: &mut RecordBuffer,
        summary: &mut RetrievalSummary,
    ) -> Result<()> {
        let query = descriptor
            .search_query()
            .ok_or_else(|| CliError::invalid_request("mode does not use the search endpoint"))?;

        info!(query = %query, "Searching UniProt");
        let spinner = progress::create_spinner(&format!("Searching: {query}"));

        let mut url = self
            .client
            .search_start_url(&query, descriptor.format, descriptor.limit);
        let mut page_index = 0usize;

        loop {
            page_index += 1;

            let page = match self.client.fetch_page(&url).await {
                Ok(page) => page,
                Err(err) if !buffer.is_empty() => {
                    warn!(
                        page = page_index,
                        error = %err,
                        "Pagination failed, keeping records retrieved so far"
                    );
                    summary.partial = true;
                    break;
                },
                Err(err) => {
                    spinner.finish_and_clear();
                    return Err(err);
                },
            };

            let added = buffer.absorb(&page.body)?;
            debug!(
                page = page_index,
                records = added,
                total = buffer.len(),
                "Page retrieved"
            );
            spinner.set_message(format!("Retrieved {} record(s)", buffer.len()));

            if buffer.len() >= descriptor.limit {
                info!(limit = descriptor.limit, "Limit reached, stopping pagination");
                break;
            }

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        spinner.finish_and_clear();
        Ok(())
    }
}
