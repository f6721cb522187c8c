//! Parser configuration: vocabularies, header policy and the layout knobs that
//! differ between statement renderings.

use serde::{Deserialize, Serialize};

use crate::dates::MonthVocabulary;
use crate::select::{ExtractionStrategy, HeaderMatch, HeaderPolicy, default_strategies};

/// Named presets for the two statement renderings seen in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Date | Description | Withdrawn | Deposited, loose header match.
    Simple,
    /// Date | Transactions | Withdrawn | Deposited | Balance, strict header match.
    #[default]
    BalanceAware,
}

impl std::str::FromStr for Profile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Profile::Simple),
            "balance-aware" | "balance" => Ok(Profile::BalanceAware),
            other => anyhow::bail!("unknown profile: {other} (expected simple | balance-aware)"),
        }
    }
}

pub const SIMPLE_HEADERS: [&str; 5] = ["Date", "Description", "Withdrawn", "Deposited", "Amount"];
pub const BALANCE_HEADERS: [&str; 6] = [
    "Date",
    "Transactions",
    "Withdrawn",
    "Deposited",
    "Balance",
    "Amount",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Trailing cells of a row assumed numeric and kept out of the description.
    pub trailing_numeric_columns: usize,
    /// Read the last trailing cell as a running balance.
    pub balance_column: bool,
    pub header: HeaderPolicy,
    /// Rows containing any of these (case-insensitive) are page furniture.
    pub footer_markers: Vec<String>,
    pub months: MonthVocabulary,
    /// Tried in order; the first strategy yielding a table wins.
    pub strategies: Vec<ExtractionStrategy>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl ParserConfig {
    pub fn for_profile(profile: Profile) -> Self {
        let (header_match, balance_column) = match profile {
            Profile::Simple => (HeaderMatch::Loose, false),
            Profile::BalanceAware => (HeaderMatch::Strict, true),
        };
        Self {
            trailing_numeric_columns: 3,
            balance_column,
            header: HeaderPolicy::new(header_match),
            footer_markers: vec!["continued on next page".to_string()],
            months: MonthVocabulary::default(),
            strategies: default_strategies(),
        }
    }

    pub fn with_header_match(mut self, mode: HeaderMatch) -> Self {
        self.header.mode = mode;
        self
    }

    pub fn with_trailing_numeric_columns(mut self, n: usize) -> Self {
        self.trailing_numeric_columns = n;
        self
    }

    pub fn with_balance_column(mut self, enabled: bool) -> Self {
        self.balance_column = enabled;
        self
    }

    /// Output header labels for this configuration.
    pub fn headers(&self) -> Vec<String> {
        if self.balance_column {
            BALANCE_HEADERS.iter().map(|h| h.to_string()).collect()
        } else {
            SIMPLE_HEADERS.iter().map(|h| h.to_string()).collect()
        }
    }
}
