//! Table selection: which extracted table on a page is the transaction table.
//!
//! Per page:
//! 1) try extraction strategies in priority order; the first one that yields a
//!    non-empty table wins (this is a priority walk, not a best-of-all search)
//! 2) among that strategy's tables, apply the selection rules in order:
//!    a table whose first row looks like the statement header, else the table
//!    with the most rows (earliest on ties)

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::cell::{Table, clean_row};
use crate::source::TableSource;

/// How an extractor segments a page along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segmentation {
    /// Infer boundaries from text alignment.
    Text,
    /// Use ruling lines drawn on the page.
    Lines,
}

impl fmt::Display for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segmentation::Text => write!(f, "text"),
            Segmentation::Lines => write!(f, "lines"),
        }
    }
}

/// One segmentation configuration handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStrategy {
    pub vertical: Segmentation,
    pub horizontal: Segmentation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_tolerance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_tolerance: Option<u32>,
}

impl ExtractionStrategy {
    pub fn new(vertical: Segmentation, horizontal: Segmentation) -> Self {
        Self {
            vertical,
            horizontal,
            snap_tolerance: None,
            text_tolerance: None,
        }
    }

    pub fn with_snap_tolerance(mut self, tolerance: u32) -> Self {
        self.snap_tolerance = Some(tolerance);
        self
    }

    pub fn with_text_tolerance(mut self, tolerance: u32) -> Self {
        self.text_tolerance = Some(tolerance);
        self
    }

    /// "vertical/horizontal", e.g. "text/lines".
    pub fn id(&self) -> String {
        format!("{}/{}", self.vertical, self.horizontal)
    }
}

/// Strategy priority order used when none is configured.
pub fn default_strategies() -> Vec<ExtractionStrategy> {
    use Segmentation::{Lines, Text};
    vec![
        ExtractionStrategy::new(Text, Text)
            .with_snap_tolerance(3)
            .with_text_tolerance(6),
        ExtractionStrategy::new(Text, Lines),
        ExtractionStrategy::new(Lines, Text),
        ExtractionStrategy::new(Lines, Lines),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderMatch {
    /// Every keyword group must be present.
    #[default]
    Strict,
    /// Any single loose keyword is enough.
    Loose,
}

/// Keywords that identify a statement's column header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderPolicy {
    pub mode: HeaderMatch,
    /// Strict mode: each group needs at least one of its keywords.
    pub required_groups: Vec<Vec<String>>,
    /// Loose mode: any one of these.
    pub any_of: Vec<String>,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::new(HeaderMatch::default())
    }
}

impl HeaderPolicy {
    pub fn new(mode: HeaderMatch) -> Self {
        let group = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            mode,
            required_groups: vec![
                group(&["date"]),
                group(&["transactions", "description"]),
                group(&["withdraw", "withdrawn"]),
                group(&["deposit"]),
                group(&["balance"]),
            ],
            any_of: group(&["transactions", "withdrawn", "deposited"]),
        }
    }

    /// Whether a row of cleaned cells reads as the header row.
    pub fn matches(&self, cells: &[String]) -> bool {
        let joined = cells.join(" ").to_lowercase();
        match self.mode {
            HeaderMatch::Strict => self
                .required_groups
                .iter()
                .all(|g| g.iter().any(|k| joined.contains(k.as_str()))),
            HeaderMatch::Loose => self.any_of.iter().any(|k| joined.contains(k.as_str())),
        }
    }
}

/// Named rules for choosing among one strategy's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    HeaderMatch,
    MostRows,
}

/// Rules are applied in this order; the first that picks a table decides.
pub const SELECTION_ORDER: [SelectionRule; 2] = [SelectionRule::HeaderMatch, SelectionRule::MostRows];

/// The table chosen for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTable {
    pub strategy: ExtractionStrategy,
    pub rule: SelectionRule,
    pub table: Table,
}

#[derive(Debug, Clone)]
pub struct TableSelector {
    strategies: Vec<ExtractionStrategy>,
    header: HeaderPolicy,
}

impl TableSelector {
    pub fn new(strategies: Vec<ExtractionStrategy>, header: HeaderPolicy) -> Self {
        Self { strategies, header }
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    fn rule_pick(&self, rule: SelectionRule, tables: &[Table]) -> Option<usize> {
        match rule {
            SelectionRule::HeaderMatch => tables.iter().position(|t| {
                t.first()
                    .map(|row| self.header.matches(&clean_row(row)))
                    .unwrap_or(false)
            }),
            SelectionRule::MostRows => {
                let mut best: Option<(usize, usize)> = None; // (idx, rows)
                for (i, t) in tables.iter().enumerate() {
                    if best.is_none_or(|(_, n)| t.len() > n) {
                        best = Some((i, t.len()));
                    }
                }
                best.map(|(i, _)| i)
            }
        }
    }

    /// Choose among the tables one strategy returned. Empty tables never win.
    pub fn choose(&self, tables: Vec<Table>) -> Option<(Table, SelectionRule)> {
        let mut tables: Vec<Table> = tables.into_iter().filter(|t| !t.is_empty()).collect();
        if tables.is_empty() {
            return None;
        }

        for rule in SELECTION_ORDER {
            if let Some(i) = self.rule_pick(rule, &tables) {
                return Some((tables.swap_remove(i), rule));
            }
        }
        None
    }

    /// Walk the strategies for one page and return the first usable table.
    pub fn select_page<S: TableSource + ?Sized>(&self, source: &S, page: usize) -> Option<SelectedTable> {
        for strategy in &self.strategies {
            let tables = match source.extract_tables(page, strategy) {
                Ok(t) => t,
                Err(e) => {
                    debug!(page = page + 1, strategy = %strategy.id(), "table parse attempt failed: {e:#}");
                    continue;
                }
            };

            if let Some((table, rule)) = self.choose(tables) {
                return Some(SelectedTable {
                    strategy: strategy.clone(),
                    rule,
                    table,
                });
            }
        }
        None
    }
}
