//! UniProt identifier shape checks
//!
//! These checks only gate log warnings — the API remains authoritative for
//! whether an identifier actually resolves.

use regex::Regex;
use std::sync::OnceLock;

/// Official UniProtKB accession pattern.
/// See <https://www.uniprot.org/help/accession_numbers>.
const ACCESSION_PATTERN: &str =
    r"^([OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2})(-[0-9]+)?$";

/// Proteome identifiers are `UP` followed by nine digits (e.g. UP000005640).
const PROTEOME_PATTERN: &str = r"^UP[0-9]{9}$";

fn accession_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ACCESSION_PATTERN).expect("accession pattern is valid"))
}

fn proteome_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PROTEOME_PATTERN).expect("proteome pattern is valid"))
}

/// Whether `id` has the shape of a UniProtKB accession (isoform suffixes
/// such as `P19338-2` are accepted).
pub fn is_accession(id: &str) -> bool {
    accession_re().is_match(id)
}

/// Whether `id` has the shape of a UniProt proteome identifier.
pub fn is_proteome_id(id: &str) -> bool {
    proteome_re().is_match(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_swissprot_accessions() {
        assert!(is_accession("P19338"));
        assert!(is_accession("Q9H2U1"));
        assert!(is_accession("O43809"));
    }

    #[test]
    fn test_accepts_trembl_and_isoform_accessions() {
        assert!(is_accession("A0A024R4E5"));
        assert!(is_accession("P19338-2"));
    }

    #[test]
    fn test_rejects_malformed_accessions() {
        assert!(!is_accession(""));
        assert!(!is_accession("p19338"));
        assert!(!is_accession("19338"));
        assert!(!is_accession("NUCL"));
        assert!(!is_accession("UP000005640"));
    }

    #[test]
    fn test_proteome_ids() {
        assert!(is_proteome_id("UP000005640"));
        assert!(!is_proteome_id("UP0000056"));
        assert!(!is_proteome_id("P19338"));
    }
}
