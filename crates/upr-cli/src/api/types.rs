//! API payload types
//!
//! Typed views of the ID-mapping job payloads the client reads. Entry and
//! search payloads are passed through untyped — see the output module.

use serde::Deserialize;

/// Response to an ID-mapping job submission
#[derive(Debug, Deserialize)]
pub struct MappingJob {
    #[serde(rename = "jobId")]
    pub job_id: String,
}

/// ID-mapping job status payload
///
/// The status endpoint redirects to the results document once the job
/// finishes, so a poll response either carries `jobStatus` (still running)
/// or the `results`/`failedIds` keys of the finished document.
#[derive(Debug, Deserialize)]
pub struct MappingStatus {
    #[serde(rename = "jobStatus")]
    pub job_status: Option<String>,

    #[serde(default)]
    pub results: Option<serde_json::Value>,

    #[serde(rename = "failedIds")]
    pub failed_ids: Option<Vec<String>>,
}

impl MappingStatus {
    /// Whether the job has produced a final document
    pub fn is_finished(&self) -> bool {
        self.results.is_some()
            || self.failed_ids.is_some()
            || self.job_status.as_deref() == Some("FINISHED")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_job_field_names() {
        let job: MappingJob = serde_json::from_str(r#"{"jobId": "abc123"}"#).unwrap();
        assert_eq!(job.job_id, "abc123");
    }

    #[test]
    fn test_mapping_status_finished_detection() {
        let running: MappingStatus = serde_json::from_str(r#"{"jobStatus": "RUNNING"}"#).unwrap();
        assert!(!running.is_finished());

        let finished: MappingStatus = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(finished.is_finished());

        let failed: MappingStatus = serde_json::from_str(r#"{"failedIds": ["BOGUS1"]}"#).unwrap();
        assert!(failed.is_finished());
    }
}
