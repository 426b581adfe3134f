//! UniProt REST API access
//!
//! URL construction, typed payload views, and the retrying HTTP client.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{ResultPage, UniProtClient};
