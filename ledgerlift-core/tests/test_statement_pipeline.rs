use anyhow::bail;
use ledgerlift_core::{
    ExtractionStrategy, ParserConfig, Profile, RowKind, StatementParser, Table, TableSource,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// In-memory statement: page -> strategy id -> tables. Strategies listed in
/// `broken` fail outright.
#[derive(Default)]
struct FakeStatement {
    pages: Vec<HashMap<String, Vec<Table>>>,
    broken: Vec<String>,
}

impl FakeStatement {
    fn page(mut self, strategy: &str, tables: Vec<Table>) -> Self {
        let mut p = HashMap::new();
        p.insert(strategy.to_string(), tables);
        self.pages.push(p);
        self
    }

    fn empty_page(mut self) -> Self {
        self.pages.push(HashMap::new());
        self
    }
}

impl TableSource for FakeStatement {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_tables(&self, page: usize, strategy: &ExtractionStrategy) -> anyhow::Result<Vec<Table>> {
        let id = strategy.id();
        if self.broken.contains(&id) {
            bail!("{id} exploded");
        }
        Ok(self.pages[page].get(&id).cloned().unwrap_or_default())
    }
}

fn row(v: &[&str]) -> Vec<Option<String>> {
    v.iter().map(|s| Some(s.to_string())).collect()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn coffee_table() -> Table {
    vec![
        row(&["Jun", "27", "Coffee Shop", "4.50", "", "1000.00"]),
        row(&["", "", "purchase fee", "", " ", ""]),
        row(&["Jun", "28", "Paycheck", "", "2000.00", "3000.00"]),
    ]
}

/// Real-shape regression: wrapped description and balance column.
#[test]
fn test_coffee_shop_and_paycheck() {
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let src = FakeStatement::default().page("text/text", vec![coffee_table()]);

    let report = parser.parse(&src);
    assert_eq!(report.transactions.len(), 2);

    let coffee = &report.transactions[0];
    assert_eq!(coffee.date, "Jun 27");
    assert!(coffee.description.contains("Coffee Shop purchase fee"));
    assert_eq!(coffee.withdrawn, Some(dec("4.50")));
    assert_eq!(coffee.deposited, None);
    assert_eq!(coffee.amount, Some(dec("-4.50")));
    assert_eq!(coffee.balance, Some(dec("1000.00")));

    let pay = &report.transactions[1];
    assert_eq!(pay.date, "Jun 28");
    assert_eq!(pay.deposited, Some(dec("2000.00")));
    assert_eq!(pay.amount, Some(dec("2000.00")));
    assert_eq!(pay.balance, Some(dec("3000.00")));

    assert_eq!(report.stats.rows_seen, 3);
    assert_eq!(report.stats.pages_without_table, 0);
}

#[test]
fn test_report_json_shape() {
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let src = FakeStatement::default().page("text/text", vec![coffee_table()]);
    let json = serde_json::to_value(parser.parse(&src)).unwrap();

    assert_eq!(
        json["headers"],
        serde_json::json!(["Date", "Transactions", "Withdrawn", "Deposited", "Balance", "Amount"])
    );
    assert_eq!(json["transactions"][0]["amount"], "-4.50");
    assert_eq!(json["transactions"][0]["deposited"], "");
    assert_eq!(json["transactions"][1]["balance"], "3000.00");
}

#[test]
fn test_simple_profile_json_has_no_balance() {
    let parser = StatementParser::new(ParserConfig::for_profile(Profile::Simple)).unwrap();
    let table = vec![
        row(&["Date", "Description", "Withdrawn", "Deposited"]),
        row(&["Jun 27", "Coffee", "4.50", ""]),
    ];
    let src = FakeStatement::default().page("text/text", vec![table]);
    let json = serde_json::to_value(parser.parse(&src)).unwrap();

    assert_eq!(
        json["headers"],
        serde_json::json!(["Date", "Description", "Withdrawn", "Deposited", "Amount"])
    );
    let t = json["transactions"][0].as_object().unwrap();
    assert!(!t.contains_key("balance"));
    assert_eq!(t["amount"], "-4.50");
}

/// A page with nothing under any strategy is skipped, later
/// pages still parse, and failing strategies fall through.
#[test]
fn test_empty_page_does_not_abort() {
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let src = FakeStatement {
        broken: vec!["text/text".to_string()],
        ..FakeStatement::default()
    }
    .empty_page()
    .page("lines/lines", vec![vec![row(&["Jun 29", "Rent", "900.00", "", "2100.00"])]]);

    let report = parser.parse(&src);
    assert_eq!(report.stats.pages, 2);
    assert_eq!(report.stats.pages_without_table, 1);
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.transactions[0].amount, Some(dec("-900.00")));
}

/// Drafts do not continue across a page break.
#[test]
fn test_page_boundary_flushes_draft() {
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let src = FakeStatement::default()
        .page("text/text", vec![vec![row(&["Jun 27", "Coffee Shop", "4.50", "", "1000.00"])]])
        .page("text/text", vec![vec![row(&["", "purchase fee", "", "", ""])]]);

    let report = parser.parse(&src);
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.transactions[0].description, "Coffee Shop");
}

#[test]
fn test_output_bounded_by_date_rows() {
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let reconciler = ledgerlift_core::Reconciler::new(parser.config()).unwrap();
    let table = vec![
        row(&["Date", "Transactions", "Withdrawn", "Deposited", "Balance"]),
        row(&["", "orphan", "", "", ""]),
        row(&["Jun", "27", "Coffee Shop", "4.50", "", "1000.00"]),
        row(&["", "", "purchase fee", "", "", ""]),
        row(&["Jun", "28", "Paycheck", "", "2000.00", "3000.00"]),
        row(&["", "", "continued on next page", "", "", ""]),
    ];

    let starts = table
        .iter()
        .enumerate()
        .filter(|(i, r)| matches!(reconciler.classify(*i, r), RowKind::Start { .. }))
        .count();
    let report = parser.parse_tables(&[table]);
    assert_eq!(starts, 2);
    assert!(report.transactions.len() <= starts);
    assert_eq!(report.transactions.len(), 2);
}

#[test]
fn test_rerun_is_byte_identical() {
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let src = FakeStatement::default()
        .page("text/text", vec![coffee_table()])
        .empty_page()
        .page("lines/text", vec![coffee_table()]);

    let a = serde_json::to_string(&parser.parse(&src)).unwrap();
    let b = serde_json::to_string(&parser.parse(&src)).unwrap();
    assert_eq!(a, b);
}
