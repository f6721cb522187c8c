use ledgerlift_core::{ParserConfig, StatementParser};
use ledgerlift_ingest::{CsvPages, GridDocument, read_csv_table};
use std::io::Write;

/// Two pages: the first only segments under lines/text (text/text errors,
/// text/lines is empty) and carries a noise table next to the statement
/// table; the second page has no tables at all.
const STATEMENT: &str = r#"{
  "pages": [
    {
      "failures": { "text/text": "text tolerance overflow" },
      "attempts": {
        "text/lines": [[]],
        "lines/text": [
          [["Account 0042"], ["Branch 7"], ["Page 1"], ["Statement period"]],
          [
            ["Date", "Transactions", "Withdrawn", "Deposited", "Balance"],
            ["Jun", "27", "Coffee Shop", "4.50", null, "1000.00"],
            [null, null, "purchase fee", null, " ", null],
            ["Jun", "28", "Paycheck", "", "2,000.00", "3,000.00"],
            [null, "Continued on next page", null]
          ]
        ]
      }
    },
    { "attempts": {} }
  ]
}"#;

#[test]
fn test_grid_document_end_to_end() {
    let doc = GridDocument::from_slice(STATEMENT.as_bytes()).unwrap();
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let report = parser.parse(&doc);

    assert_eq!(report.stats.pages, 2);
    assert_eq!(report.stats.pages_without_table, 1);
    assert_eq!(report.stats.rows_seen, 5);

    let json = serde_json::to_value(&report).unwrap();
    let txns = json["transactions"].as_array().unwrap();
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0]["description"], "Coffee Shop purchase fee");
    assert_eq!(txns[0]["withdrawn"], "4.50");
    assert_eq!(txns[0]["amount"], "-4.50");
    assert_eq!(txns[0]["balance"], "1000.00");
    assert_eq!(txns[1]["deposited"], "2000.00");
    assert_eq!(txns[1]["amount"], "2000.00");
    assert_eq!(txns[1]["balance"], "3000.00");
}

#[test]
fn test_csv_pages_end_to_end() {
    let mut page = tempfile::NamedTempFile::new().unwrap();
    writeln!(page, "Jun,27,Coffee Shop,4.50,,1000.00").unwrap();
    writeln!(page, ",,purchase fee,,,").unwrap();
    writeln!(page, "Jun,28,Paycheck,,2000.00,3000.00").unwrap();

    let pages = CsvPages::from_paths(&[page.path()]).unwrap();
    let parser = StatementParser::new(ParserConfig::default()).unwrap();
    let report = parser.parse(&pages);

    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.transactions[0].description, "Coffee Shop purchase fee");

    // Same rows through an in-memory source give the same result.
    let table = read_csv_table(std::fs::read(page.path()).unwrap().as_slice()).unwrap();
    let again = parser.parse(&CsvPages::new(vec![table]));
    assert_eq!(again.transactions, report.transactions);
}
