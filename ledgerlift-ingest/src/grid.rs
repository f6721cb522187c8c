//! Grid documents: the JSON a PDF-to-cells service returns for one statement.
//!
//! Shape:
//!   {
//!     "pages": [
//!       {
//!         "attempts": { "text/text": [ [ ["Jun", "27", "Coffee Shop", "4.50", null, "1000.00"] ] ] },
//!         "failures": { "lines/lines": "no ruling lines on page" }
//!       }
//!     ]
//!   }
//!
//! `attempts` maps a strategy id to the tables it produced; `failures` records
//! strategies that errored on that page.

use anyhow::{Context, Result, anyhow, bail};
use ledgerlift_core::{ExtractError, ExtractionStrategy, Table, TableSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPage {
    #[serde(default)]
    pub attempts: BTreeMap<String, Vec<Table>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridDocument {
    #[serde(default)]
    pub pages: Vec<GridPage>,
}

impl GridDocument {
    /// Decode a grid document. Empty input and undecodable JSON are
    /// request-fatal.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ExtractError> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ExtractError::EmptyPayload);
        }
        serde_json::from_slice(bytes).map_err(|e| ExtractError::InvalidDocument(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Ok(Self::from_slice(&bytes)?)
    }
}

impl TableSource for GridDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_tables(&self, page: usize, strategy: &ExtractionStrategy) -> Result<Vec<Table>> {
        let p = self
            .pages
            .get(page)
            .ok_or_else(|| anyhow!("page {} out of range", page + 1))?;

        let id = strategy.id();
        if let Some(reason) = p.failures.get(&id) {
            bail!("{id}: {reason}");
        }
        Ok(p.attempts.get(&id).cloned().unwrap_or_default())
    }
}
