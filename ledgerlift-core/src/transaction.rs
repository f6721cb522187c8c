//! Transaction synthesis: the open draft a row walk accumulates into, the
//! immutable record it becomes, and the signed amount rule.

use crate::cell::{ParsedAmount, clean, format_amount};
use crate::columns::RowAmounts;

/// Signed net amount of a transaction.
///
/// Withdrawals are printed as positive magnitudes but are outflows, so they
/// are negated. A zero withdrawal next to a deposit reports the deposit, and a
/// zero withdrawal on its own stays `0` rather than `-0`.
pub fn signed_amount(withdrawn: ParsedAmount, deposited: ParsedAmount) -> ParsedAmount {
    match (withdrawn, deposited) {
        (Some(w), d) if d.is_none() || !w.is_zero() => Some(if w.is_zero() { w } else { -w }),
        (_, Some(d)) => Some(d),
        _ => None,
    }
}

/// A transaction still open to continuation rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub date: String,
    pub description: String,
    pub withdrawn: ParsedAmount,
    pub deposited: ParsedAmount,
    pub balance: ParsedAmount,
}

impl TransactionDraft {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amounts: RowAmounts) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            withdrawn: amounts.withdrawn,
            deposited: amounts.deposited,
            balance: amounts.balance,
        }
    }

    /// Append wrapped description text with a single separating space.
    pub fn append_description(&mut self, text: &str) {
        self.description = clean(&format!("{} {}", self.description, text));
    }

    /// Fill amounts that are still absent. Present fields are never replaced.
    pub fn backfill(&mut self, amounts: RowAmounts) {
        if self.withdrawn.is_none() {
            self.withdrawn = amounts.withdrawn;
        }
        if self.deposited.is_none() {
            self.deposited = amounts.deposited;
        }
        if self.balance.is_none() {
            self.balance = amounts.balance;
        }
    }

    pub fn amount(&self) -> ParsedAmount {
        signed_amount(self.withdrawn, self.deposited)
    }

    pub fn finalize(self) -> Transaction {
        let amount = self.amount();
        Transaction {
            date: self.date,
            description: self.description,
            withdrawn: self.withdrawn,
            deposited: self.deposited,
            balance: self.balance,
            amount,
        }
    }
}

/// A finalized statement transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub withdrawn: ParsedAmount,
    pub deposited: ParsedAmount,
    pub balance: ParsedAmount,
    pub amount: ParsedAmount,
}

impl Transaction {
    /// Flat field-name → string view. Absent amounts are "".
    pub fn fields(&self, include_balance: bool) -> Vec<(&'static str, String)> {
        let mut out = vec![
            ("date", self.date.clone()),
            ("description", self.description.clone()),
            ("withdrawn", format_amount(&self.withdrawn)),
            ("deposited", format_amount(&self.deposited)),
        ];
        if include_balance {
            out.push(("balance", format_amount(&self.balance)));
        }
        out.push(("amount", format_amount(&self.amount)));
        out
    }
}
