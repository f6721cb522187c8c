//! Row classification and merging.
//!
//! A table is folded row by row into transactions. The fold state is the open
//! draft, if any:
//!
//!   NoOpenDraft --date row--> DraftOpen
//!   DraftOpen   --date row--> DraftOpen   (previous draft emitted)
//!   DraftOpen   --other row-> DraftOpen   (description/amounts wrapped in)
//!   NoOpenDraft --other row-> NoOpenDraft (row discarded)
//!
//! and `finish` emits whatever is still open at the end of the table.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::cell::{Row, Table, clean_row};
use crate::columns::resolve_amounts;
use crate::config::ParserConfig;
use crate::dates::DateClassifier;
use crate::select::HeaderPolicy;
use crate::transaction::{Transaction, TransactionDraft};

/// What a single row means to the fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Every cell empty.
    Blank,
    /// Page furniture such as "continued on next page".
    Footer,
    /// Column header on the first row of a table.
    Header,
    /// Opens a transaction; `rest` is what follows the date cell(s).
    Start { date: String, rest: Vec<String> },
    /// Wrapped text/amounts of the previous transaction.
    Continuation(Vec<String>),
}

/// Open draft between rows. `None` means no draft is open.
pub type DraftState = Option<TransactionDraft>;

#[derive(Debug, Clone)]
pub struct Reconciler {
    dates: DateClassifier,
    header: HeaderPolicy,
    footer: Option<Regex>,
    trailing_numeric_columns: usize,
    balance_column: bool,
}

impl Reconciler {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let markers: Vec<String> = config
            .footer_markers
            .iter()
            .filter(|m| !m.trim().is_empty())
            .map(|m| regex::escape(m.trim()))
            .collect();

        let footer = if markers.is_empty() {
            None
        } else {
            let re = RegexBuilder::new(&markers.join("|"))
                .case_insensitive(true)
                .build()
                .context("compile footer markers")?;
            Some(re)
        };

        Ok(Self {
            dates: DateClassifier::new(config.months.clone()),
            header: config.header.clone(),
            footer,
            trailing_numeric_columns: config.trailing_numeric_columns,
            balance_column: config.balance_column,
        })
    }

    /// Cells that are not part of the trailing numeric window.
    fn leading_text<'a>(&self, cells: &'a [String]) -> &'a [String] {
        if cells.len() >= self.trailing_numeric_columns {
            &cells[..cells.len() - self.trailing_numeric_columns]
        } else {
            cells
        }
    }

    /// Classify one row. `index` is the row's position in its table.
    pub fn classify(&self, index: usize, row: &Row) -> RowKind {
        let cells = clean_row(row);
        if cells.iter().all(|c| c.is_empty()) {
            return RowKind::Blank;
        }

        if let Some(re) = &self.footer {
            if re.is_match(&cells.join(" ")) {
                return RowKind::Footer;
            }
        }

        if index == 0 && self.header.matches(&cells) {
            return RowKind::Header;
        }

        match self.dates.leading_date(&cells) {
            Some(lead) => RowKind::Start {
                date: lead.date,
                rest: cells[lead.cells_used..].to_vec(),
            },
            None => RowKind::Continuation(cells),
        }
    }

    /// Apply one row to the fold, returning the new state and any emitted record.
    pub fn step(&self, state: DraftState, index: usize, row: &Row) -> (DraftState, Option<Transaction>) {
        match self.classify(index, row) {
            RowKind::Blank | RowKind::Footer | RowKind::Header => (state, None),

            RowKind::Start { date, rest } => {
                let emitted = state.map(TransactionDraft::finalize);
                let description = join_nonempty(self.leading_text(&rest));
                let amounts = resolve_amounts(&rest, self.balance_column);
                (Some(TransactionDraft::new(date, description, amounts)), emitted)
            }

            RowKind::Continuation(cells) => {
                let Some(mut draft) = state else {
                    return (None, None);
                };
                draft.append_description(&join_nonempty(self.leading_text(&cells)));
                draft.backfill(resolve_amounts(&cells, self.balance_column));
                (Some(draft), None)
            }
        }
    }

    /// Close the fold at the end of a table.
    pub fn finish(&self, state: DraftState) -> Option<Transaction> {
        state.map(TransactionDraft::finalize)
    }

    /// Fold a whole table into transactions, in row order.
    pub fn reconcile_table(&self, table: &Table) -> Vec<Transaction> {
        let mut out = Vec::new();
        let mut state: DraftState = None;

        for (index, row) in table.iter().enumerate() {
            let (next, emitted) = self.step(state, index, row);
            out.extend(emitted);
            state = next;
        }
        out.extend(self.finish(state));

        out
    }
}

fn join_nonempty(cells: &[String]) -> String {
    cells
        .iter()
        .filter(|c| !c.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
