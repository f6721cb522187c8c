//! Date classifier: recognizes the "<Month> <Day>" transaction dates that open
//! a statement row.
//!
//! Two renderings show up in extracted tables:
//!   Jun | 27 | Coffee Shop | 4.50 | ...      (month and day in adjacent cells)
//!   Jun 27 | Coffee Shop | 4.50 | ...        (pre-joined in one cell)
//!
//! Only month abbreviation + day number is recognized; there is no year on
//! these rows, so the date stays a string.

use serde::{Deserialize, Serialize};

use crate::cell::clean;

pub const ENGLISH_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The month-name vocabulary a statement is written in.
///
/// A cell is a month when its first `prefix_len` characters, title-cased,
/// equal one of `abbreviations` ("JUNE" and "june" both match "Jun").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthVocabulary {
    pub abbreviations: Vec<String>,
    pub prefix_len: usize,
}

impl Default for MonthVocabulary {
    fn default() -> Self {
        Self::new(ENGLISH_MONTHS, 3)
    }
}

impl MonthVocabulary {
    pub fn new<I, S>(abbreviations: I, prefix_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            abbreviations: abbreviations.into_iter().map(Into::into).collect(),
            prefix_len,
        }
    }

    pub fn contains(&self, s: &str) -> bool {
        let head = title_case(&clean(s), self.prefix_len);
        !head.is_empty() && self.abbreviations.iter().any(|m| *m == head)
    }
}

fn title_case(s: &str, len: usize) -> String {
    let mut out = String::new();
    for (i, c) in s.chars().take(len).enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// A recognized leading date and how many cells it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingDate {
    pub date: String,
    pub cells_used: usize,
}

/// Date recognition over one vocabulary.
#[derive(Debug, Clone, Default)]
pub struct DateClassifier {
    months: MonthVocabulary,
}

impl DateClassifier {
    pub fn new(months: MonthVocabulary) -> Self {
        Self { months }
    }

    pub fn is_month(&self, s: &str) -> bool {
        self.months.contains(s)
    }

    /// Exactly one or two decimal digits once cleaned.
    pub fn is_day(&self, s: &str) -> bool {
        let s = clean(s);
        (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Single-cell form: "<Month> <Day>" optionally followed by other text,
    /// e.g. "Jun 27 Opening Balance". The trailing text is ignored.
    pub fn is_date_cell(&self, s: &str) -> bool {
        self.joined_date(s).is_some()
    }

    fn joined_date(&self, s: &str) -> Option<String> {
        let mut tokens = s.split_whitespace();
        let month = tokens.next()?;
        let day = tokens.next()?;
        if self.is_month(month) && self.is_day(day) {
            Some(format!("{month} {day}"))
        } else {
            None
        }
    }

    /// Detect a date at the start of a cleaned row.
    ///
    /// The split form (month cell followed by day cell) is tried first, then
    /// the joined single-cell form.
    pub fn leading_date(&self, cells: &[String]) -> Option<LeadingDate> {
        let first = cells.first()?;
        if let Some(second) = cells.get(1) {
            if self.is_month(first) && self.is_day(second) {
                return Some(LeadingDate {
                    date: format!("{first} {second}"),
                    cells_used: 2,
                });
            }
        }

        self.joined_date(first).map(|date| LeadingDate {
            date,
            cells_used: 1,
        })
    }
}

pub fn is_month(s: &str) -> bool {
    DateClassifier::default().is_month(s)
}

pub fn is_day(s: &str) -> bool {
    DateClassifier::default().is_day(s)
}

pub fn is_date_cell(s: &str) -> bool {
    DateClassifier::default().is_date_cell(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_month() {
        assert!(is_month("Jun"));
        assert!(is_month("JUNE"));
        assert!(is_month(" dec "));
        assert!(!is_month("xyz"));
        assert!(!is_month(""));
        assert!(!is_month("Ju"));
    }

    #[test]
    fn test_is_day() {
        assert!(is_day("7"));
        assert!(is_day("27"));
        assert!(is_day(" 05 "));
        assert!(!is_day("123"));
        assert!(!is_day(""));
        assert!(!is_day("2a"));
    }

    #[test]
    fn test_is_date_cell() {
        assert!(is_date_cell("Jun 27"));
        assert!(is_date_cell("Jun 27 Opening Balance"));
        assert!(!is_date_cell("Jun"));
        assert!(!is_date_cell("Coffee 27"));
        assert!(!is_date_cell("Jun 2024"));
    }

    #[test]
    fn test_leading_date_split_cells() {
        let c = DateClassifier::default();
        let d = c.leading_date(&cells(&["Jun", "27", "Coffee Shop"])).unwrap();
        assert_eq!(d.date, "Jun 27");
        assert_eq!(d.cells_used, 2);
    }

    #[test]
    fn test_leading_date_joined_cell() {
        let c = DateClassifier::default();
        let d = c
            .leading_date(&cells(&["Jun 28 Opening Balance", "", "1000.00"]))
            .unwrap();
        assert_eq!(d.date, "Jun 28");
        assert_eq!(d.cells_used, 1);

        assert_eq!(c.leading_date(&cells(&["", "", "purchase fee"])), None);
        assert_eq!(c.leading_date(&[]), None);
    }

    /// A substituted vocabulary replaces the English one.
    #[test]
    fn test_custom_vocabulary() {
        let german = MonthVocabulary::new(
            ["Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez"],
            3,
        );
        let c = DateClassifier::new(german);
        assert!(c.is_date_cell("Mär 3"));
        assert!(c.is_date_cell("OKTOBER 12"));
        assert!(!c.is_date_cell("Oct 12"));
    }
}
