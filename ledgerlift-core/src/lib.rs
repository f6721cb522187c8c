//! ledgerlift-core: reconciles extracted statement table rows into transactions.

pub mod cell;
pub mod columns;
pub mod config;
pub mod dates;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod select;
pub mod source;
pub mod transaction;

pub use cell::{Cell, ParsedAmount, Row, Table, clean, parse_amount};
pub use columns::{Layout, RowAmounts, resolve_amounts, resolve_withdraw_deposit};
pub use config::{ParserConfig, Profile};
pub use dates::{DateClassifier, MonthVocabulary, is_date_cell, is_day, is_month};
pub use error::ExtractError;
pub use merge::{Reconciler, RowKind};
pub use pipeline::{ParseStats, StatementParser, StatementReport};
pub use select::{
    ExtractionStrategy, HeaderMatch, HeaderPolicy, Segmentation, SelectionRule, TableSelector,
    default_strategies,
};
pub use source::TableSource;
pub use transaction::{Transaction, TransactionDraft, signed_amount};
