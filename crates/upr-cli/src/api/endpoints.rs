//! API endpoint URL builders
//!
//! Helper functions to construct UniProt REST endpoint URLs. The base URL
//! is the service root (https://rest.uniprot.org); each builder appends the
//! resource path.

/// Build an entry-by-accession URL, e.g.
/// `https://rest.uniprot.org/uniprotkb/P19338.fasta`.
pub fn entry_url(base_url: &str, accession: &str, format: &str, fields: Option<&str>) -> String {
    let mut url = format!("{}/uniprotkb/{}.{}", base_url, accession, format);

    if let Some(fields) = fields {
        url.push_str(&format!("?fields={}", urlencoding::encode(fields)));
    }

    url
}

/// Build a search URL with query, format, and page size.
pub fn search_url(
    base_url: &str,
    query: &str,
    format: &str,
    size: usize,
    fields: Option<&str>,
) -> String {
    let mut url = format!(
        "{}/uniprotkb/search?query={}&format={}&size={}",
        base_url,
        urlencoding::encode(query),
        format,
        size
    );

    if let Some(fields) = fields {
        url.push_str(&format!("&fields={}", urlencoding::encode(fields)));
    }

    url
}

/// Build the ID-mapping job submission URL
pub fn idmapping_run_url(base_url: &str) -> String {
    format!("{}/idmapping/run", base_url)
}

/// Build the ID-mapping job status URL
pub fn idmapping_status_url(base_url: &str, job_id: &str) -> String {
    format!("{}/idmapping/status/{}", base_url, job_id)
}

/// Build the ID-mapping results URL
pub fn idmapping_results_url(base_url: &str, job_id: &str, format: &str) -> String {
    format!("{}/idmapping/results/{}?format={}", base_url, job_id, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://rest.uniprot.org";

    #[test]
    fn test_entry_url() {
        let url = entry_url(BASE, "P19338", "fasta", None);
        assert_eq!(url, "https://rest.uniprot.org/uniprotkb/P19338.fasta");
    }

    #[test]
    fn test_entry_url_with_fields() {
        let url = entry_url(BASE, "P19338", "tsv", Some("accession,length"));
        assert_eq!(
            url,
            "https://rest.uniprot.org/uniprotkb/P19338.tsv?fields=accession%2Clength"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url(BASE, "gene:NUCL AND reviewed:true", "fasta", 500, None);
        assert_eq!(
            url,
            "https://rest.uniprot.org/uniprotkb/search?query=gene%3ANUCL%20AND%20reviewed%3Atrue&format=fasta&size=500"
        );
    }

    #[test]
    fn test_search_url_with_fields() {
        let url = search_url(BASE, "insulin", "tsv", 25, Some("accession,length"));
        assert!(url.ends_with("&fields=accession%2Clength"));
        assert!(url.contains("&size=25"));
    }

    #[test]
    fn test_idmapping_urls() {
        assert_eq!(
            idmapping_run_url(BASE),
            "https://rest.uniprot.org/idmapping/run"
        );
        assert_eq!(
            idmapping_status_url(BASE, "abc123"),
            "https://rest.uniprot.org/idmapping/status/abc123"
        );
        assert_eq!(
            idmapping_results_url(BASE, "abc123", "fasta"),
            "https://rest.uniprot.org/idmapping/results/abc123?format=fasta"
        );
    }
}
