//! Churn Calculator CLI
//!
//! Command-line reporting over a customer contract export

use anyhow::{Context, Result};
use chrono::NaiveDate;
use churn_calculator::churn::SeriesConfig;
use churn_calculator::records::{load_statuses, parse_date};
use churn_calculator::{snapshot_churn_rate, ChurnAnalyzer, PeriodResult, SeriesResult};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "churn", version, about = "Churn Rate Calculator for Energy and Gas Companies")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Compute series windows in parallel
    #[arg(long, global = true)]
    parallel: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Status-based churn rate (CSV with customer_id, status)
    Snapshot { file: PathBuf },

    /// Churn for one custom [start, end) range
    Period {
        file: PathBuf,
        #[arg(long, value_parser = date_arg)]
        start: NaiveDate,
        #[arg(long, value_parser = date_arg)]
        end: NaiveDate,
    },

    /// Twelve monthly churn rates for a year
    Monthly {
        file: PathBuf,
        #[arg(long)]
        year: i32,
    },

    /// Four quarterly churn rates for a year
    Quarterly {
        file: PathBuf,
        #[arg(long)]
        year: i32,
    },

    /// One churn rate per calendar year in a range
    Yearly {
        file: PathBuf,
        #[arg(long)]
        from: i32,
        #[arg(long)]
        to: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

/// Flat output row shared by period and series reports
#[derive(Debug, Serialize)]
struct ReportRow {
    ordinal: Option<i32>,
    period_start: NaiveDate,
    period_end: NaiveDate,
    active_at_start: u64,
    active_at_end: u64,
    churned_count: u64,
    churn_rate: f64,
}

impl ReportRow {
    fn new(ordinal: Option<i32>, result: &PeriodResult) -> Self {
        Self {
            ordinal,
            period_start: result.period_start,
            period_end: result.period_end,
            active_at_start: result.active_at_start,
            active_at_end: result.active_at_end,
            churned_count: result.churned_count,
            churn_rate: result.churn_rate,
        }
    }
}

#[derive(Debug, Serialize)]
struct SnapshotReport {
    total_customers: usize,
    churned_customers: usize,
    churn_rate: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SeriesConfig { parallel: cli.parallel };

    match &cli.command {
        Command::Snapshot { file } => {
            let records = load_statuses(file)
                .with_context(|| format!("Failed to load statuses from {}", file.display()))?;
            let report = SnapshotReport {
                total_customers: records.len(),
                churned_customers: records.iter().filter(|r| r.is_churned()).count(),
                churn_rate: snapshot_churn_rate(&records),
            };
            print_snapshot(&report, cli.format)?;
        }
        Command::Period { file, start, end } => {
            let analyzer = load(file, config)?;
            let result = analyzer.period(*start, *end)?;
            print_rows(&[ReportRow::new(None, &result)], "period", cli.format)?;
        }
        Command::Monthly { file, year } => {
            let series = load(file, config)?.monthly(*year)?;
            print_series(&series, cli.format)?;
        }
        Command::Quarterly { file, year } => {
            let series = load(file, config)?.quarterly(*year)?;
            print_series(&series, cli.format)?;
        }
        Command::Yearly { file, from, to } => {
            let series = load(file, config)?.yearly(*from, *to)?;
            print_series(&series, cli.format)?;
        }
    }

    Ok(())
}

fn load(file: &Path, config: SeriesConfig) -> Result<ChurnAnalyzer> {
    let analyzer = ChurnAnalyzer::from_csv(file)
        .with_context(|| format!("Failed to load contracts from {}", file.display()))?;
    Ok(analyzer.with_config(config))
}

fn print_snapshot(report: &SnapshotReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("Churn Rate Calculator for Energy and Gas Companies");
            println!("{}", "-".repeat(50));
            println!("Customers: {}", report.total_customers);
            println!("Churned:   {}", report.churned_customers);
            println!("\nChurn Rate: {:.2}%", report.churn_rate);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.serialize(report)?;
            writer.flush()?;
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn print_series(series: &SeriesResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(series)?);
            Ok(())
        }
        _ => {
            let rows: Vec<ReportRow> = series
                .iter()
                .map(|p| ReportRow::new(Some(p.ordinal), &p.result))
                .collect();
            print_rows(&rows, series.granularity.ordinal_name(), format)
        }
    }
}

fn print_rows(rows: &[ReportRow], label: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{:>8} {:>11} {:>11} {:>9} {:>9} {:>8} {:>9}",
                label, "Start", "End", "AtStart", "AtEnd", "Churned", "Rate %");
            println!("{}", "-".repeat(71));
            for row in rows {
                let ordinal = row.ordinal.map(|o| o.to_string()).unwrap_or_default();
                println!("{:>8} {:>11} {:>11} {:>9} {:>9} {:>8} {:>9.2}",
                    ordinal,
                    row.period_start.to_string(),
                    row.period_end.to_string(),
                    row.active_at_start,
                    row.active_at_end,
                    row.churned_count,
                    row.churn_rate,
                );
            }
        }
        OutputFormat::Csv => {
            // Header names the ordinal column after the partition, like the table
            let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(io::stdout());
            writer.write_record([
                label,
                "period_start",
                "period_end",
                "active_at_start",
                "active_at_end",
                "churned_count",
                "churn_rate",
            ])?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
    }
    Ok(())
}
