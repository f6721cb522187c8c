//! Cell normalization: whitespace cleanup and best-effort amount salvage.
//!
//! Statement renderers inject stray currency symbols, footnote marks and
//! thousands separators into amount cells. Parsing here never fails: anything
//! that cannot be read as an exact decimal is simply absent.

use rust_decimal::Decimal;
use std::str::FromStr;

/// One extracted cell. `None` when the extractor produced nothing for it.
pub type Cell = Option<String>;

/// Ordered cells of one physical table row.
pub type Row = Vec<Cell>;

/// One table candidate: the rows produced by a single extraction strategy.
pub type Table = Vec<Row>;

/// Exact decimal amount, or absent.
pub type ParsedAmount = Option<Decimal>;

/// Collapse whitespace runs to a single space and trim both ends.
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a possibly-missing cell; missing cells become "".
pub fn clean_cell(cell: &Cell) -> String {
    cell.as_deref().map(clean).unwrap_or_default()
}

/// Clean every cell of a row.
pub fn clean_row(row: &Row) -> Vec<String> {
    row.iter().map(clean_cell).collect()
}

/// Salvage an exact decimal from an amount cell.
///
/// Thousands separators are dropped, then every character other than a digit,
/// a decimal point or a leading minus sign. A residual without digits (this
/// covers "" and a lone "-") or one that still fails to parse yields `None`.
pub fn parse_amount(s: &str) -> ParsedAmount {
    let mut residual = String::new();
    for c in clean(s).chars() {
        match c {
            '0'..='9' | '.' => residual.push(c),
            '-' if residual.is_empty() => residual.push(c),
            _ => {}
        }
    }

    if !residual.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&residual).ok()
}

/// Render an amount the way it is serialized: exact decimal text, "" if absent.
pub fn format_amount(amount: &ParsedAmount) -> String {
    amount.map(|d| d.to_string()).unwrap_or_default()
}
