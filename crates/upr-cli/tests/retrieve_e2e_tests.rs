//! End-to-end tests for the upr binary
//!
//! These tests validate the full retrieval workflow against a mock
//! UniProt server:
//! - Single and batch accession fetches
//! - Retry/backoff bounds and 404 short-circuiting
//! - Pagination with a result limit
//! - Per-format output assembly
//! - ID mapping submit/poll/results flow
//! - CLI mode exclusivity

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build an upr command pointed at the mock server, with retry
/// and poll delays shrunk so failure paths stay fast.
fn upr_cmd(server: &MockServer, dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("upr").expect("upr binary builds");
    cmd.current_dir(dir.path())
        .env("UPR_BASE_URL", server.uri())
        .env("UPR_RETRY_BASE_MS", "1")
        .env("UPR_POLL_INTERVAL_MS", "1");
    cmd
}

fn fasta_record(accession: &str) -> String {
    format!(">sp|{accession}|TEST_HUMAN Test protein OS=Homo sapiens OX=9606\nMKVLAAGGSTTAQNPPRSDE\n")
}

fn fasta_page(count: usize, offset: usize) -> String {
    (0..count)
        .map(|i| fasta_record(&format!("P{:05}", offset + i)))
        .collect()
}

#[tokio::test]
async fn test_single_id_success_writes_wrapped_fasta() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let sequence = "M".repeat(75);
    Mock::given(method("GET"))
        .and(path("/uniprotkb/P19338.fasta"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            ">sp|P19338|NUCL_HUMAN Nucleolin OS=Homo sapiens OX=9606\n{sequence}\n"
        )))
        .expect(1)
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args(["--ids", "P19338", "--output", "out.fasta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieved 1 record(s)"));

    let content = fs::read_to_string(dir.path().join("out.fasta")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], ">sp|P19338|NUCL_HUMAN Nucleolin OS=Homo sapiens OX=9606");
    // Sequence re-wrapped at 60 columns, characters preserved.
    assert_eq!(lines[1].len(), 60);
    assert_eq!(lines[2].len(), 15);
    assert_eq!(lines[1..].concat(), sequence);
}

#[tokio::test]
async fn test_missing_id_fails_without_retry() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // expect(1): a 404 must trigger exactly zero retries.
    Mock::given(method("GET"))
        .and(path("/uniprotkb/P00000.fasta"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args(["--ids", "P00000", "--output", "out.fasta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[tokio::test]
async fn test_batch_continues_past_failed_entries() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    for accession in ["P19338", "P09651"] {
        Mock::given(method("GET"))
            .and(path(format!("/uniprotkb/{accession}.fasta")))
            .respond_with(ResponseTemplate::new(200).set_body_string(fasta_record(accession)))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/uniprotkb/P00000.fasta"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args(["--ids", "P19338", "P00000", "P09651", "--output", "out.fasta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieved 2 record(s)"))
        .stdout(predicate::str::contains("1 entry failed"));

    let content = fs::read_to_string(dir.path().join("out.fasta")).unwrap();
    assert_eq!(content.matches('>').count(), 2);
    assert!(content.contains("P19338"));
    assert!(content.contains("P09651"));
    assert!(!content.contains("P00000"));
}

#[tokio::test]
async fn test_server_errors_retry_exactly_five_times() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // expect(5): at most five attempts, never more.
    Mock::given(method("GET"))
        .and(path("/uniprotkb/P19338.fasta"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args(["--ids", "P19338", "--output", "out.fasta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("after 5 attempts"));
}

#[tokio::test]
async fn test_pagination_stops_at_limit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let uri = server.uri();

    let next = |cursor: &str| {
        format!(
            "<{uri}/uniprotkb/search?cursor={cursor}&query=insulin&format=fasta&size=25>; rel=\"next\""
        )
    };

    // Three pages of ten records; the limit of 25 must cut the third page.
    Mock::given(method("GET"))
        .and(path("/uniprotkb/search"))
        .and(query_param("cursor", "p2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next("p3").as_str())
                .set_body_string(fasta_page(10, 10)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uniprotkb/search"))
        .and(query_param("cursor", "p3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fasta_page(10, 20)))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uniprotkb/search"))
        .and(query_param("query", "insulin AND reviewed:true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next("p2").as_str())
                .set_body_string(fasta_page(10, 0)),
        )
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args([
            "--query", "insulin", "--limit", "25", "--output", "out.fasta",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieved 25 record(s)"));

    let content = fs::read_to_string(dir.path().join("out.fasta")).unwrap();
    assert_eq!(content.matches('>').count(), 25);
}

#[tokio::test]
async fn test_tsv_batch_keeps_one_header() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let rows = [
        ("P19338", "Entry\tGene Names\tOrganism\tLength\tSequence\nP19338\tNCL\tHomo sapiens\t710\tMVKLAK\n"),
        ("P09651", "Entry\tGene Names\tOrganism\tLength\tSequence\nP09651\tHNRNPA1\tHomo sapiens\t372\tMSKSES\n"),
    ];
    for (accession, body) in rows {
        Mock::given(method("GET"))
            .and(path(format!("/uniprotkb/{accession}.tsv")))
            .and(query_param(
                "fields",
                "accession,gene_names,organism_name,length,sequence",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    upr_cmd(&server, &dir)
        .args([
            "--ids", "P19338", "P09651", "--format", "tsv", "--output", "out.tsv",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("out.tsv")).unwrap();
    assert_eq!(content.matches("Entry\t").count(), 1);
    assert!(content.contains("P19338\tNCL"));
    assert!(content.contains("P09651\tHNRNPA1"));
}

#[tokio::test]
async fn test_id_mapping_submits_polls_and_downloads() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/idmapping/run"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "jobId": "job42" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    // First poll still running, second poll finished.
    Mock::given(method("GET"))
        .and(path("/idmapping/status/job42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "jobStatus": "RUNNING" })),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/idmapping/status/job42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "jobStatus": "FINISHED", "results": [], "failedIds": ["BOGUS1"] }),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/results/job42"))
        .and(query_param("format", "fasta"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("{}{}", fasta_record("P19338"), fasta_record("P09651"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args([
            "--map", "NCL_HUMAN", "HNRNPA1_HUMAN", "--output", "mapped.fasta",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieved 2 record(s)"));

    let content = fs::read_to_string(dir.path().join("mapped.fasta")).unwrap();
    assert_eq!(content.matches('>').count(), 2);
}

#[tokio::test]
async fn test_conflicting_modes_are_a_usage_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // No mocks mounted: the process must fail before any network call.
    upr_cmd(&server, &dir)
        .args([
            "--ids", "P19338", "--query", "insulin", "--output", "out.fasta",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_json_output_merges_results() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/uniprotkb/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                { "primaryAccession": "P19338" },
                { "primaryAccession": "P09651" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    upr_cmd(&server, &dir)
        .args([
            "--genes", "NCL", "HNRNPA1", "--format", "json", "--output", "out.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieved 2 record(s)"));

    let content = fs::read_to_string(dir.path().join("out.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["results"].as_array().unwrap().len(), 2);
    assert_eq!(doc["results"][0]["primaryAccession"], "P19338");
}
