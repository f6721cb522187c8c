use anyhow::{Context, Result};
use clap::ValueEnum;
use ledgerlift_core::StatementReport;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

pub fn write_json<W: Write>(report: &StatementReport, mut w: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, report).context("serialize report")?;
    writeln!(w)?;
    Ok(())
}

/// Header labels, then one record per transaction in the same column order.
pub fn write_csv<W: Write>(report: &StatementReport, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(&report.headers)?;
    for record in report.records() {
        wtr.write_record(record.iter().map(|(_, v)| v.as_str()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// `{"error": "..."}`, the request-level failure body.
pub fn error_body(err: &anyhow::Error) -> String {
    serde_json::json!({ "error": format!("{err:#}") }).to_string()
}

/// Write to `out`, or stdout when unset. Returns a label for the summary line.
pub fn emit(report: &StatementReport, format: Format, out: &Option<PathBuf>) -> Result<String> {
    let mut buf = Vec::new();
    match format {
        Format::Json => write_json(report, &mut buf)?,
        Format::Csv => write_csv(report, &mut buf)?,
    }

    match out {
        Some(path) => {
            fs::write(path, &buf).with_context(|| format!("write {}", path.display()))?;
            Ok(path.display().to_string())
        }
        None => {
            std::io::stdout().write_all(&buf)?;
            Ok("stdout".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlift_core::{ParserConfig, StatementParser};

    fn report() -> StatementReport {
        let parser = StatementParser::new(ParserConfig::default()).unwrap();
        let row = |v: &[&str]| v.iter().map(|s| Some(s.to_string())).collect::<Vec<_>>();
        parser.parse_tables(&[vec![
            row(&["Jun", "27", "Coffee, Shop", "4.50", "", "1000.00"]),
            row(&["Jun", "28", "Paycheck", "", "2000.00", "3000.00"]),
        ]])
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_csv(&report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Date,Transactions,Withdrawn,Deposited,Balance,Amount");
        assert_eq!(lines[1], "Jun 27,\"Coffee, Shop\",4.50,,1000.00,-4.50");
        assert_eq!(lines[2], "Jun 28,Paycheck,,2000.00,3000.00,2000.00");
    }

    #[test]
    fn test_json_output_and_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let label = emit(&report(), Format::Json, &Some(path.clone())).unwrap();
        assert_eq!(label, path.display().to_string());

        let v: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(v["transactions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_error_body() {
        let err = anyhow::Error::new(ledgerlift_core::ExtractError::EmptyPayload);
        assert_eq!(error_body(&err), r#"{"error":"Empty file"}"#);
    }
}
