//! The boundary to the PDF-to-cells collaborator.

use anyhow::Result;

use crate::cell::Table;
use crate::select::ExtractionStrategy;

/// A statement whose pages can be segmented into tables.
///
/// Pages are numbered from 0. An `Err` from `extract_tables` means this one
/// strategy failed on this one page; the caller moves on to the next strategy.
pub trait TableSource {
    fn page_count(&self) -> usize;

    fn extract_tables(&self, page: usize, strategy: &ExtractionStrategy) -> Result<Vec<Table>>;
}
