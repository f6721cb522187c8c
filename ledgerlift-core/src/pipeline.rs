//! Statement pipeline: page loop over a `TableSource`, table selection, row
//! folding and the final report.

use anyhow::Result;
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use tracing::info;

use crate::cell::Table;
use crate::config::ParserConfig;
use crate::merge::Reconciler;
use crate::select::TableSelector;
use crate::source::TableSource;
use crate::transaction::Transaction;

/// Counters gathered while parsing one statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub pages: usize,
    pub pages_without_table: usize,
    pub rows_seen: usize,
}

/// Header labels plus the ordered transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementReport {
    pub headers: Vec<String>,
    pub transactions: Vec<Transaction>,
    pub include_balance: bool,
    pub stats: ParseStats,
}

impl StatementReport {
    pub fn records(&self) -> impl Iterator<Item = Vec<(&'static str, String)>> + '_ {
        self.transactions.iter().map(|t| t.fields(self.include_balance))
    }
}

struct Record<'a> {
    txn: &'a Transaction,
    include_balance: bool,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.txn.fields(self.include_balance);
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (k, v) in &fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for StatementReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let records: Vec<Record<'_>> = self
            .transactions
            .iter()
            .map(|txn| Record {
                txn,
                include_balance: self.include_balance,
            })
            .collect();

        let mut s = serializer.serialize_struct("StatementReport", 2)?;
        s.serialize_field("headers", &self.headers)?;
        s.serialize_field("transactions", &records)?;
        s.end()
    }
}

/// Turns a statement's tables into transactions. Holds only configuration, so
/// one parser can serve any number of statements.
#[derive(Debug, Clone)]
pub struct StatementParser {
    config: ParserConfig,
    selector: TableSelector,
    reconciler: Reconciler,
}

impl StatementParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        let selector = TableSelector::new(config.strategies.clone(), config.header.clone());
        let reconciler = Reconciler::new(&config)?;
        Ok(Self {
            config,
            selector,
            reconciler,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse every page of `source` in order.
    ///
    /// Pages without a usable table under any strategy are logged and skipped.
    pub fn parse<S: TableSource + ?Sized>(&self, source: &S) -> StatementReport {
        let mut stats = ParseStats {
            pages: source.page_count(),
            ..ParseStats::default()
        };
        let mut transactions = Vec::new();

        for page in 0..stats.pages {
            let Some(chosen) = self.selector.select_page(source, page) else {
                info!("[Pg {}] No tables found", page + 1);
                stats.pages_without_table += 1;
                continue;
            };

            stats.rows_seen += chosen.table.len();
            info!(
                strategy = %chosen.strategy.id(),
                rule = ?chosen.rule,
                "[Pg {}] Rows detected: {}",
                page + 1,
                chosen.table.len()
            );
            transactions.extend(self.reconciler.reconcile_table(&chosen.table));
        }

        info!("Total table rows seen (all pages): {}", stats.rows_seen);
        info!("Total transactions extracted: {}", transactions.len());

        self.report(transactions, stats)
    }

    /// Parse already-selected tables, one per page, skipping selection.
    pub fn parse_tables(&self, tables: &[Table]) -> StatementReport {
        let stats = ParseStats {
            pages: tables.len(),
            pages_without_table: tables.iter().filter(|t| t.is_empty()).count(),
            rows_seen: tables.iter().map(Vec::len).sum(),
        };
        let transactions = tables
            .iter()
            .flat_map(|t| self.reconciler.reconcile_table(t))
            .collect();
        self.report(transactions, stats)
    }

    fn report(&self, transactions: Vec<Transaction>, stats: ParseStats) -> StatementReport {
        StatementReport {
            headers: self.config.headers(),
            transactions,
            include_balance: self.config.balance_column,
            stats,
        }
    }
}
