//! Pre-extracted CSV pages.
//!
//! Some extractors export one CSV per page instead of a grid document. Such a
//! page has exactly one table and no strategy alternatives, so every strategy
//! sees the same table and the first one wins.

use anyhow::{Context, Result};
use ledgerlift_core::{ExtractionStrategy, Row, Table, TableSource};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvPages {
    tables: Vec<Table>,
}

/// Read one CSV page. Rows may have differing lengths; empty fields are
/// missing cells.
pub fn read_csv_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut table = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Row = record
            .iter()
            .map(|f| if f.is_empty() { None } else { Some(f.to_string()) })
            .collect();
        table.push(row);
    }
    Ok(table)
}

impl CsvPages {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Load pages in the order given.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut tables = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            tables.push(read_csv_table(file).with_context(|| format!("parsing {}", path.display()))?);
        }
        Ok(Self { tables })
    }
}

impl TableSource for CsvPages {
    fn page_count(&self) -> usize {
        self.tables.len()
    }

    fn extract_tables(&self, page: usize, _strategy: &ExtractionStrategy) -> Result<Vec<Table>> {
        Ok(self
            .tables
            .get(page)
            .filter(|t| !t.is_empty())
            .cloned()
            .into_iter()
            .collect())
    }
}
