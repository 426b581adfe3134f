//! Shared library for UPR components
//!
//! Provides the pieces both the CLI and any future tooling need:
//!
//! - **Logging**: centralized tracing configuration (`logging`)
//! - **FASTA**: record model and fixed-width rendering (`fasta`)
//! - **Identifiers**: UniProt accession / proteome shape checks (`ids`)

pub mod fasta;
pub mod ids;
pub mod logging;

pub use fasta::FastaRecord;
