use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use ledgerscan_finance::{batch_totals, summarize_by_month};
use ledgerscan_ingest::{
    BatchOutcome, FileDocument, FormatHint, Pipeline, PipelineOptions, RecognizerRegistry,
    YearScope,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod export;
mod state;

use config::Config;
use export::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerscan",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERSCAN_BUILD_SHA"), ")"),
    about = "Extract transactions from bank statement text"
)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from page-text files (.txt with form feeds, or .json pages)
    Extract {
        #[command(flatten)]
        input: InputArgs,

        /// Append per-month statistics
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Per-month totals and balances only
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List supported bank formats
    Formats,

    /// Manage ~/.ledgerscan/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Extracted statement files, processed in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Bank format: auto, maybank, pbb, rhb, cimb (default from config)
    #[arg(long)]
    bank: Option<String>,

    /// Fallback year for DD/MM rows when the statement declares none
    #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=9999))]
    year: Option<i32>,

    /// Keep inferred-year state per document or across the whole batch
    #[arg(long)]
    year_scope: Option<YearScope>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Extract {
            input,
            summary,
            output,
        } => {
            let cfg = config::load_config()?;
            let outcome = run_pipeline(&input, &cfg)?;
            let format = output.format.unwrap_or(cfg.output.format);
            let rows = summary.then(|| summarize_by_month(&outcome.transactions));

            let mut w = open_output(output.output.as_ref())?;
            export::write_report(&mut w, format, &outcome.transactions, rows.as_deref())?;
            w.flush()?;
            report_status(&outcome);
        }

        Command::Summary { input, output } => {
            let cfg = config::load_config()?;
            let outcome = run_pipeline(&input, &cfg)?;
            let format = output.format.unwrap_or(cfg.output.format);
            let rows = summarize_by_month(&outcome.transactions);

            let mut w = open_output(output.output.as_ref())?;
            export::write_summary(&mut w, format, &rows)?;
            w.flush()?;
            report_status(&outcome);
        }

        Command::Formats => {
            let registry = RecognizerRegistry::standard();
            println!("Formats in auto-detect priority order:\n");
            for r in registry.iter() {
                println!(
                    "- {:<8} aliases: {:<28} hints: {}",
                    r.id(),
                    r.aliases().join(", "),
                    r.keywords().join(", ")
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => println!("{}", config::config_path()?.display()),
        },
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "ledgerscan=info",
        1 => "ledgerscan=debug",
        _ => "ledgerscan=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Flags win over config; the year falls back to the current calendar year.
fn pipeline_options(input: &InputArgs, cfg: &Config, registry: &RecognizerRegistry) -> Result<PipelineOptions> {
    let bank = input.bank.as_deref().unwrap_or(&cfg.extract.bank);
    let Ok(hint) = bank.parse::<FormatHint>();
    if let FormatHint::Explicit(name) = &hint {
        if registry.find(name).is_none() {
            bail!(
                "unknown bank format {:?} (expected auto or one of: {})",
                name,
                registry.ids().join(", ")
            );
        }
    }

    Ok(PipelineOptions {
        hint,
        fallback_year: Some(
            input
                .year
                .or(cfg.extract.default_year)
                .unwrap_or_else(|| chrono::Local::now().year()),
        ),
        year_scope: input.year_scope.unwrap_or(cfg.extract.year_scope),
    })
}

fn run_pipeline(input: &InputArgs, cfg: &Config) -> Result<BatchOutcome> {
    let registry = RecognizerRegistry::standard();
    let options = pipeline_options(input, cfg, &registry)?;
    let docs: Vec<FileDocument> = input.files.iter().map(FileDocument::new).collect();

    let outcome = Pipeline::new(registry, options).extract(&docs);
    for failure in &outcome.failures {
        error!(source = %failure.source_file, "{}", failure.error);
    }
    if outcome.transactions.is_empty() {
        warn!("No transactions found. Check that the right bank format is selected (--bank).");
    }
    Ok(outcome)
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn report_status(outcome: &BatchOutcome) {
    let totals = batch_totals(&outcome.transactions);
    eprintln!(
        "Parsed {} transactions across {} month(s) | debit={:.2} credit={:.2} | failed documents: {}",
        totals.transaction_count,
        totals.months,
        totals.total_debit,
        totals.total_credit,
        outcome.failures.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bank: Option<&str>, year: Option<i32>) -> InputArgs {
        InputArgs {
            files: vec![PathBuf::from("a.txt")],
            bank: bank.map(str::to_string),
            year,
            year_scope: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut cfg = Config::default();
        cfg.extract.default_year = Some(2020);
        cfg.extract.year_scope = YearScope::Session;
        let registry = RecognizerRegistry::standard();

        let opts = pipeline_options(&input(Some("Maybank"), Some(2024)), &cfg, &registry).unwrap();
        assert_eq!(opts.hint, FormatHint::Explicit("maybank".to_string()));
        assert_eq!(opts.fallback_year, Some(2024));
        assert_eq!(opts.year_scope, YearScope::Session);

        let opts = pipeline_options(&input(None, None), &cfg, &registry).unwrap();
        assert_eq!(opts.hint, FormatHint::Auto);
        assert_eq!(opts.fallback_year, Some(2020));
    }

    #[test]
    fn test_unknown_bank_is_rejected_up_front() {
        let registry = RecognizerRegistry::standard();
        let err = pipeline_options(&input(Some("hsbc"), None), &Config::default(), &registry).unwrap_err();
        assert!(err.to_string().contains("hsbc"));
    }

    #[test]
    fn test_cli_parses_extract_flags() {
        let cli = Cli::try_parse_from([
            "ledgerscan",
            "extract",
            "a.txt",
            "b.json",
            "--bank",
            "cimb",
            "--year-scope",
            "session",
            "--format",
            "csv",
            "--summary",
        ])
        .unwrap();
        let Command::Extract { input, summary, output } = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(input.files.len(), 2);
        assert_eq!(input.year_scope, Some(YearScope::Session));
        assert_eq!(output.format, Some(OutputFormat::Csv));
        assert!(summary);
    }

    #[test]
    fn test_year_flag_is_bounded() {
        assert!(Cli::try_parse_from(["ledgerscan", "extract", "a.txt", "--year", "2147483647"]).is_err());
        let cli = Cli::try_parse_from(["ledgerscan", "summary", "a.txt", "--year", "2024"]).unwrap();
        let Command::Summary { input, .. } = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(input.year, Some(2024));
    }
}
