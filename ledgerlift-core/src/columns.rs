//! Column resolver: decides which trailing cells of a row hold the withdrawn
//! and deposited amounts.
//!
//! Extractors do not agree on how many trailing numeric columns a row has, so
//! each candidate layout is interpreted and scored by how many of its two
//! fields parse to an amount. Ties go to the layout listed first in the
//! priority order.

use crate::cell::{ParsedAmount, parse_amount};

/// A named interpretation of a row's trailing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// withdrawn = cells[-2], deposited = cells[-1]
    TwoColumn,
    /// withdrawn = cells[-3], deposited = cells[-2]; the last cell is a balance
    ThreeColumn,
}

/// Interpretation order; earlier entries win ties.
pub const LAYOUT_PRIORITY: [Layout; 2] = [Layout::TwoColumn, Layout::ThreeColumn];

impl Layout {
    pub fn min_cells(self) -> usize {
        match self {
            Layout::TwoColumn => 2,
            Layout::ThreeColumn => 3,
        }
    }

    /// Read this layout's fields from `cells`, or `None` if the row is too short.
    pub fn interpret(self, cells: &[String]) -> Option<Interpretation> {
        let n = cells.len();
        if n < self.min_cells() {
            return None;
        }
        let (w, d) = match self {
            Layout::TwoColumn => (n - 2, n - 1),
            Layout::ThreeColumn => (n - 3, n - 2),
        };
        Some(Interpretation {
            layout: self,
            withdrawn: parse_amount(&cells[w]),
            deposited: parse_amount(&cells[d]),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub layout: Layout,
    pub withdrawn: ParsedAmount,
    pub deposited: ParsedAmount,
}

impl Interpretation {
    /// Number of fields that parsed to an amount.
    pub fn score(&self) -> usize {
        usize::from(self.withdrawn.is_some()) + usize::from(self.deposited.is_some())
    }
}

/// Pick the best-scoring interpretation in `priority` order.
pub fn best_interpretation(cells: &[String], priority: &[Layout]) -> Option<Interpretation> {
    let mut best: Option<Interpretation> = None;

    for layout in priority {
        let Some(candidate) = layout.interpret(cells) else {
            continue;
        };
        if best.as_ref().is_none_or(|b| candidate.score() > b.score()) {
            best = Some(candidate);
        }
    }

    best
}

/// (withdrawn, deposited) from a row's trailing cells. Both absent when fewer
/// than two cells remain.
pub fn resolve_withdraw_deposit(cells: &[String]) -> (ParsedAmount, ParsedAmount) {
    best_interpretation(cells, &LAYOUT_PRIORITY)
        .map(|i| (i.withdrawn, i.deposited))
        .unwrap_or((None, None))
}

/// Amounts read from one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowAmounts {
    pub withdrawn: ParsedAmount,
    pub deposited: ParsedAmount,
    pub balance: ParsedAmount,
}

/// Read the amounts of a row remainder.
///
/// With `balance_column` set and at least three cells, the last cell is the
/// running balance and withdrawn/deposited are resolved from the cells before
/// it. Otherwise the resolver sees every cell and no balance is read.
pub fn resolve_amounts(cells: &[String], balance_column: bool) -> RowAmounts {
    if cells.len() < 2 {
        return RowAmounts::default();
    }

    if balance_column && cells.len() >= 3 {
        let (body, last) = cells.split_at(cells.len() - 1);
        let (withdrawn, deposited) = resolve_withdraw_deposit(body);
        return RowAmounts {
            withdrawn,
            deposited,
            balance: parse_amount(&last[0]),
        };
    }

    let (withdrawn, deposited) = resolve_withdraw_deposit(cells);
    RowAmounts {
        withdrawn,
        deposited,
        balance: None,
    }
}
