//! ledgerlift-ingest: table sources for the reconciliation engine (grid JSON,
//! per-page CSV) and the remote extraction service client.

pub mod csv_pages;
pub mod grid;
pub mod remote;

pub use csv_pages::{CsvPages, read_csv_table};
pub use grid::{GridDocument, GridPage};
pub use remote::ExtractorClient;
