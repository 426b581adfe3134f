//! HTTP client for the UniProt REST API
//!
//! Wraps reqwest with the behaviors every call site needs: a
//! contact-bearing User-Agent, per-request timeouts, bounded retry with
//! exponential backoff, and Link-header pagination. Requests are issued
//! one at a time; no concurrency is layered on top, out of rate-limit
//! etiquette toward the API.

use crate::api::endpoints;
use crate::api::types::{MappingJob, MappingStatus};
use crate::error::{CliError, Result};
use crate::output::OutputFormat;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, info, warn};

// ============================================================================
// API Client Constants
// ============================================================================

/// Default UniProt REST service root.
/// Can be overridden via the --base-url flag or UPR_BASE_URL.
pub const DEFAULT_BASE_URL: &str = "https://rest.uniprot.org";

/// Maximum attempts per HTTP call (initial try included).
pub const MAX_RETRIES: u32 = 5;

/// Timeout for entry-by-accession and job-control requests, in seconds.
pub const ENTRY_TIMEOUT_SECS: u64 = 30;

/// Timeout for search and bulk-result requests, in seconds.
pub const SEARCH_TIMEOUT_SECS: u64 = 60;

/// Base backoff delay in milliseconds; attempt `n` waits `base * 2^n`.
/// Overridable via UPR_RETRY_BASE_MS (used by the e2e tests).
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Interval between ID-mapping status polls, in milliseconds.
/// Overridable via UPR_POLL_INTERVAL_MS.
pub const POLL_INTERVAL_MS: u64 = 3000;

/// Upper bound on ID-mapping status polls before giving up.
pub const MAX_STATUS_POLLS: u32 = 100;

/// Records requested per search page (the API maximum).
pub const PAGE_SIZE: usize = 500;

/// Compute the backoff delay before retrying after failed attempt
/// `attempt` (0-indexed). A plain function with no hidden state; the delay
/// doubles with each attempt.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

/// One fetched page of results plus the pagination cursor, taken verbatim
/// from the `Link` header. Terminal when `next` is `None`.
#[derive(Debug)]
pub struct ResultPage {
    pub body: String,
    pub next: Option<String>,
}

/// Extract the `rel="next"` URL from an HTTP `Link` header.
pub fn extract_next_url(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        if part.contains(r#"rel="next""#) {
            let url = part.split(';').next()?.trim().trim_matches(['<', '>']);
            return Some(url.to_string());
        }
    }
    None
}

/// API client for the UniProt REST service
pub struct UniProtClient {
    client: Client,
    base_url: String,
    retry_base: Duration,
    poll_interval: Duration,
}

impl UniProtClient {
    /// Create a new client. The contact identifier goes into the
    /// User-Agent header, per UniProt API etiquette.
    pub fn new(base_url: impl Into<String>, contact: &str) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let user_agent = format!("upr/{} (Contact: {})", env!("CARGO_PKG_VERSION"), contact);

        let client = Client::builder().user_agent(user_agent).build()?;

        info!(base_url = %base_url, contact = %contact, "Initialized UniProt client");

        Ok(Self {
            client,
            base_url,
            retry_base: env_duration_ms("UPR_RETRY_BASE_MS", RETRY_BASE_DELAY_MS),
            poll_interval: env_duration_ms("UPR_POLL_INTERVAL_MS", POLL_INTERVAL_MS),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a single entry by accession in the requested format.
    pub async fn fetch_entry(&self, accession: &str, format: OutputFormat) -> Result<String> {
        let url = endpoints::entry_url(
            &self.base_url,
            accession,
            format.as_str(),
            format.tsv_fields(),
        );
        let timeout = Duration::from_secs(ENTRY_TIMEOUT_SECS);

        let response = self
            .send_with_retry(|| self.client.get(&url).timeout(timeout), accession)
            .await?;

        debug!(accession, "Entry retrieved");
        Ok(response.text().await?)
    }

    /// Build the first-page search URL for a query.
    pub fn search_start_url(&self, query: &str, format: OutputFormat, size: usize) -> String {
        endpoints::search_url(
            &self.base_url,
            query,
            format.as_str(),
            size.min(PAGE_SIZE),
            format.tsv_fields(),
        )
    }

    /// Fetch one page of search results from `url`, returning the body and
    /// the next-page URL from the `Link` header, if any.
    pub async fn fetch_page(&self, url: &str) -> Result<ResultPage> {
        let timeout = Duration::from_secs(SEARCH_TIMEOUT_SECS);

        let response = self
            .send_with_retry(|| self.client.get(url).timeout(timeout), "search page")
            .await?;

        let next = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_next_url);

        let body = response.text().await?;
        Ok(ResultPage { body, next })
    }

    /// Run an ID-mapping job: submit, poll until finished, download the
    /// result document in the requested format.
    pub async fn map_ids(
        &self,
        ids: &[String],
        from_db: &str,
        to_db: &str,
        format: OutputFormat,
    ) -> Result<String> {
        let timeout = Duration::from_secs(ENTRY_TIMEOUT_SECS);
        let run_url = endpoints::idmapping_run_url(&self.base_url);
        let params = [
            ("ids", ids.join(",")),
            ("from", from_db.to_string()),
            ("to", to_db.to_string()),
        ];

        info!(count = ids.len(), from_db, to_db, "Submitting ID mapping job");

        let response = self
            .send_with_retry(
                || self.client.post(&run_url).timeout(timeout).form(&params),
                "ID mapping submission",
            )
            .await?;

        let job: MappingJob = response
            .json()
            .await
            .map_err(|e| CliError::malformed(format!("ID mapping submission: {e}")))?;

        info!(job_id = %job.job_id, "ID mapping job submitted");

        let status_url = endpoints::idmapping_status_url(&self.base_url, &job.job_id);

        for poll in 0..MAX_STATUS_POLLS {
            let response = self
                .send_with_retry(
                    || self.client.get(&status_url).timeout(timeout),
                    "ID mapping status",
                )
                .await?;

            let status: MappingStatus = response
                .json()
                .await
                .map_err(|e| CliError::malformed(format!("ID mapping status: {e}")))?;

            if status.is_finished() {
                if let Some(failed) = &status.failed_ids {
                    if !failed.is_empty() {
                        warn!(count = failed.len(), ids = ?failed, "IDs could not be mapped");
                    }
                }

                let results_url =
                    endpoints::idmapping_results_url(&self.base_url, &job.job_id, format.as_str());
                let results = self
                    .send_with_retry(
                        || {
                            self.client
                                .get(&results_url)
                                .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
                        },
                        "ID mapping results",
                    )
                    .await?;

                info!(job_id = %job.job_id, "ID mapping completed");
                return Ok(results.text().await?);
            }

            debug!(job_id = %job.job_id, poll = poll + 1, "Job still running, waiting");
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(CliError::timeout(format!(
            "ID mapping job {} still running after {} status polls",
            job.job_id, MAX_STATUS_POLLS
        )))
    }

    /// Issue a request up to [`MAX_RETRIES`] times with exponential
    /// backoff. A 404 short-circuits into `NotFound` without a retry; any
    /// other failure (network error, timeout, unexpected status) is
    /// transient and retried.
    async fn send_with_retry<F>(&self, make_request: F, context: &str) -> Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_error: Option<CliError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_base, attempt - 1);
                debug!(
                    context,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }

            match make_request().send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == StatusCode::NOT_FOUND {
                        warn!(context, "Not found (404), not retrying");
                        return Err(CliError::not_found(context.to_string()));
                    }

                    warn!(
                        context,
                        status = %status,
                        attempt = attempt + 1,
                        max_attempts = MAX_RETRIES,
                        "Request failed"
                    );
                    last_error = Some(CliError::network(format!("{context}: status {status}")));
                },
                Err(err) if err.is_timeout() => {
                    warn!(context, attempt = attempt + 1, "Request timed out");
                    last_error = Some(CliError::timeout(context.to_string()));
                },
                Err(err) => {
                    warn!(context, error = %err, attempt = attempt + 1, "Network error");
                    last_error = Some(CliError::network(format!("{context}: {err}")));
                },
            }
        }

        error!(context, max_attempts = MAX_RETRIES, "Retries exhausted");

        Err(match last_error {
            Some(CliError::Timeout(msg)) => {
                CliError::timeout(format!("{msg} (after {MAX_RETRIES} attempts)"))
            },
            Some(CliError::Network(msg)) => {
                CliError::network(format!("{msg} (after {MAX_RETRIES} attempts)"))
            },
            _ => CliError::network(format!("{context} (after {MAX_RETRIES} attempts)")),
        })
    }
}

fn env_duration_ms(var: &str, default_ms: u64) -> Duration {
    let ms = std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(ms)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_strips_trailing_slash() {
        let client = UniProtClient::new("http://localhost:9000/", "test@example.com").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(400));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_delay_is_non_decreasing() {
        let base = Duration::from_millis(250);
        let delays: Vec<_> = (0..MAX_RETRIES).map(|i| backoff_delay(base, i)).collect();
        for pair in delays.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_extract_next_url() {
        let header = r#"<https://rest.uniprot.org/uniprotkb/search?cursor=abc&query=insulin&size=500>; rel="next""#;
        assert_eq!(
            extract_next_url(header).as_deref(),
            Some("https://rest.uniprot.org/uniprotkb/search?cursor=abc&query=insulin&size=500")
        );
    }

    #[test]
    fn test_extract_next_url_ignores_other_rels() {
        let header = r#"<https://example.org/first>; rel="first", <https://example.org/page2>; rel="next""#;
        assert_eq!(
            extract_next_url(header).as_deref(),
            Some("https://example.org/page2")
        );

        assert_eq!(extract_next_url(r#"<https://example.org/x>; rel="last""#), None);
        assert_eq!(extract_next_url(""), None);
    }

    #[test]
    fn test_search_start_url_caps_page_size() {
        let client = UniProtClient::new("http://localhost:9000", "test@example.com").unwrap();
        let url = client.search_start_url("insulin", OutputFormat::Fasta, 100_000);
        assert!(url.contains("size=500"));

        let url = client.search_start_url("insulin", OutputFormat::Fasta, 25);
        assert!(url.contains("size=25"));
    }
}
