use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ledgerlift_core::{Profile, StatementParser, StatementReport};
use ledgerlift_ingest::{CsvPages, ExtractorClient, GridDocument};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod state;

use output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerlift",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERLIFT_BUILD_SHA"), ")"),
    about = "Turn extracted bank-statement tables into transactions"
)]
struct Cli {
    /// Log per-strategy attempts (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Parser profile: simple | balance-aware (defaults to the config file)
    #[arg(long)]
    profile: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement that was already segmented into tables
    Parse {
        /// Grid JSON produced by the extraction service
        #[arg(long, conflicts_with = "csv")]
        grid: Option<PathBuf>,

        /// One CSV file per page, in page order
        #[arg(long, num_args = 1..)]
        csv: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Send a statement PDF to the extraction service, then parse the result
    Extract {
        /// Local PDF file
        #[arg(long, conflicts_with = "url")]
        pdf: Option<PathBuf>,

        /// Fetch the PDF from this URL first
        #[arg(long)]
        url: Option<String>,

        /// Extraction service base URL (defaults to the config file)
        #[arg(long)]
        service: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage ~/.ledgerlift/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse { grid, csv, output } => {
            let cfg = config::load_config()?;
            let parser = build_parser(&cfg, &output)?;
            let result = parse_local(grid, &csv, &parser);
            finish(result, &output)?;
        }

        Command::Extract {
            pdf,
            url,
            service,
            output,
        } => {
            let cfg = config::load_config()?;
            let parser = build_parser(&cfg, &output)?;
            let base_url = service.unwrap_or_else(|| cfg.service.base_url.clone());
            let client = ExtractorClient::new(base_url, Duration::from_secs(cfg.service.timeout_secs))?;
            let result = extract_remote(&client, pdf, url, &parser).await;
            finish(result, &output)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,ledgerlift_core={level},ledgerlift_ingest={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_parser(cfg: &config::Config, output: &OutputArgs) -> Result<StatementParser> {
    let profile = output
        .profile
        .as_deref()
        .map(str::parse::<Profile>)
        .transpose()?;
    StatementParser::new(cfg.parser.to_parser_config(profile))
}

fn parse_local(grid: Option<PathBuf>, csv: &[PathBuf], parser: &StatementParser) -> Result<StatementReport> {
    if let Some(path) = grid {
        let doc = GridDocument::from_path(&path)?;
        return Ok(parser.parse(&doc));
    }
    if !csv.is_empty() {
        let pages = CsvPages::from_paths(csv)?;
        return Ok(parser.parse(&pages));
    }
    bail!("pass --grid <file.json> or --csv <page.csv>...")
}

async fn extract_remote(
    client: &ExtractorClient,
    pdf: Option<PathBuf>,
    url: Option<String>,
    parser: &StatementParser,
) -> Result<StatementReport> {
    let bytes = match (pdf, url) {
        (Some(path), _) => std::fs::read(&path).with_context(|| format!("read {}", path.display()))?,
        (None, Some(url)) => client.fetch_pdf(&url).await?,
        (None, None) => bail!("pass --pdf <path> or --url <url>"),
    };

    let doc = client.extract(&bytes, &parser.config().strategies).await?;
    Ok(parser.parse(&doc))
}

/// Emit the report, or the error body for JSON callers.
fn finish(result: Result<StatementReport>, output: &OutputArgs) -> Result<()> {
    let report = match result {
        Ok(r) => r,
        Err(e) if output.format == Format::Json => {
            error!("Error extracting transactions: {e:#}");
            println!("{}", output::error_body(&e));
            std::process::exit(1);
        }
        Err(e) => return Err(e),
    };

    let label = output::emit(&report, output.format, &output.out)?;
    eprintln!(
        "Parsed {} transactions from {} pages ({} without a table, {} rows seen) -> {}",
        report.transactions.len(),
        report.stats.pages,
        report.stats.pages_without_table,
        report.stats.rows_seen,
        label
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_args(profile: Option<&str>) -> OutputArgs {
        OutputArgs {
            profile: profile.map(str::to_string),
            format: Format::Json,
            out: None,
        }
    }

    #[test]
    fn test_build_parser_uses_loaded_config() {
        let cfg = config::parse_config("[parser]\nprofile = \"simple\"\ntrailing_numeric_columns = 2\n").unwrap();

        let parser = build_parser(&cfg, &output_args(None)).unwrap();
        assert!(!parser.config().balance_column);
        assert_eq!(parser.config().trailing_numeric_columns, 2);

        let parser = build_parser(&cfg, &output_args(Some("balance-aware"))).unwrap();
        assert!(parser.config().balance_column);
        assert_eq!(parser.config().trailing_numeric_columns, 2);

        assert!(build_parser(&cfg, &output_args(Some("fancy"))).is_err());
    }
}
