//! CLI entry point for the tabsift data-quality toolkit.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tabsift::types::{ColumnStatistics, SuspectedType};
use tabsift::utils::format_number;
use tabsift::{
    CleaningDirective, CleaningReport, ConcernStatus, ExportFormat, HeaderRow, InputFormat,
    MissingValueStrategy, QualityReport, Session, SiftConfig, TableProfile,
};
use tracing::{debug, info, warn};

/// CLI-compatible missing value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Leave missing values alone
    None,
    /// Drop rows with missing values
    Drop,
    /// Fill numeric columns with their mean
    Mean,
    /// Fill numeric columns with their median
    Median,
    /// Fill any column with its most frequent value
    Mode,
}

impl From<CliMissingStrategy> for MissingValueStrategy {
    fn from(cli: CliMissingStrategy) -> Self {
        match cli {
            CliMissingStrategy::None => MissingValueStrategy::None,
            CliMissingStrategy::Drop => MissingValueStrategy::Drop,
            CliMissingStrategy::Mean => MissingValueStrategy::FillMean,
            CliMissingStrategy::Median => MissingValueStrategy::FillMedian,
            CliMissingStrategy::Mode => MissingValueStrategy::FillMode,
        }
    }
}

/// CLI-compatible export format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli: CliExportFormat) -> Self {
        match cli {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Xlsx => ExportFormat::Xlsx,
            CliExportFormat::Json => ExportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data-quality profiling, cleaning and export for tabular files",
    long_about = "Profile a csv, xlsx, xls or json file, report data-quality issues, \
                  apply cleaning operations and export the result.\n\n\
                  EXAMPLES:\n  \
                  # Profile and quality report\n  \
                  tabsift data.csv\n\n  \
                  # Fill numeric gaps, drop duplicates, write xlsx\n  \
                  tabsift data.csv --missing mean --drop-duplicates -o clean.xlsx\n\n  \
                  # Header on the third row of a spreadsheet\n  \
                  tabsift report.xlsx --header 2\n\n  \
                  # Machine-readable output\n  \
                  tabsift data.json --json | jq .quality.issues"
)]
struct Args {
    /// Path to the input file
    input: PathBuf,

    /// Input format (csv, xlsx, xls, json)
    ///
    /// Taken from the file extension when omitted
    #[arg(short, long)]
    format: Option<String>,

    /// Header row: "auto" or a zero-based row index
    #[arg(long, default_value = "auto")]
    header: String,

    /// Replace all column names, comma separated
    #[arg(long, value_delimiter = ',')]
    headers: Option<Vec<String>>,

    /// Strategy for missing values
    #[arg(long, value_enum, default_value = "none")]
    missing: CliMissingStrategy,

    /// Restrict the missing value strategy to these columns, comma separated
    #[arg(long, value_delimiter = ',')]
    missing_columns: Option<Vec<String>>,

    /// Remove duplicate rows, keeping the first occurrence
    #[arg(long)]
    drop_duplicates: bool,

    /// Remove columns with at most one distinct value
    #[arg(long)]
    drop_constant: bool,

    /// Parse a column as numbers (repeatable)
    #[arg(long = "coerce", value_name = "COLUMN")]
    coerce: Vec<String>,

    /// Also coerce every column the quality report suspects to be numeric
    #[arg(long)]
    coerce_candidates: bool,

    /// Write the cleaned table to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format; taken from the output extension when omitted
    #[arg(long, value_enum)]
    export_format: Option<CliExportFormat>,

    /// Fraction of values that must parse before a column is flagged
    #[arg(long, default_value = "0.9")]
    mismatch_threshold: f64,

    /// Number of most frequent values listed per categorical column
    #[arg(long, default_value = "5")]
    top_n: usize,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only the final JSON document is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = SiftConfig::builder()
        .mismatch_threshold(args.mismatch_threshold)
        .top_n_values(args.top_n)
        .build()?;

    let format = match args.format.as_deref() {
        Some(tag) => tag.parse::<InputFormat>()?,
        None => InputFormat::from_path(&args.input)?,
    };
    let header: HeaderRow = args.header.parse()?;

    info!("Loading {} as {}", args.input.display(), format);
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mut session = Session::open(&bytes, format, header, config)?;

    if let Some(names) = &args.headers {
        session.apply_headers(names.as_slice())?;
    } else if session.headers_suspect() {
        warn!("No header row detected; column names were generated (use --headers to set them)");
    }

    let before = session.assess()?;

    let directive = build_directive(&args, &before.quality);
    let cleaning = if directive.is_noop() {
        debug!("No cleaning requested");
        None
    } else {
        Some(session.clean(&directive))
    };
    let after = match &cleaning {
        Some(_) => Some(session.quality()),
        None => None,
    };

    let exported = match &args.output {
        Some(path) => Some(export(&session, path, args.export_format)?),
        None => None,
    };

    if args.json {
        let document = json!({
            "input": args.input.display().to_string(),
            "format": format,
            "headers_suspect": session.source().headers_synthesized(),
            "profile": before.profile,
            "quality": before.quality,
            "cleaning": cleaning,
            "quality_after": after,
            "output": exported.map(|(path, format)| json!({
                "path": path.display().to_string(),
                "format": format,
            })),
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_profile(&args.input, &before.profile);
    print_quality(&before.quality);
    if let Some(report) = &cleaning {
        print_cleaning(report);
    }
    if let Some((path, format)) = exported {
        println!("Exported {} to {}", format, path.display());
    }
    Ok(())
}

fn build_directive(args: &Args, quality: &QualityReport) -> CleaningDirective {
    let mut directive = CleaningDirective::new()
        .missing(args.missing.into())
        .remove_duplicates(args.drop_duplicates)
        .remove_constant_columns(args.drop_constant)
        .coerce_numeric(args.coerce.iter().cloned());

    if let Some(columns) = &args.missing_columns {
        directive = directive.missing_columns(columns.iter().cloned());
    }

    if args.coerce_candidates {
        let candidates: Vec<String> = quality
            .type_mismatches
            .iter()
            .filter(|m| m.suspected_type == SuspectedType::Numeric)
            .map(|m| m.column.clone())
            .collect();
        info!("Coercing {} suspected numeric columns", candidates.len());
        directive = directive.coerce_numeric(candidates);
    }

    directive
}

fn export(
    session: &Session,
    path: &Path,
    format: Option<CliExportFormat>,
) -> Result<(PathBuf, ExportFormat)> {
    let format = match format {
        Some(format) => format.into(),
        None => ExportFormat::from_path(path)?,
    };
    let bytes = session.export(format)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok((path.to_path_buf(), format))
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(format_stat).unwrap_or_else(|| "-".to_string())
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format_number(value)
    } else {
        format!("{:.4}", value)
    }
}

// Output here uses `println!` on purpose: it is the result of the command and
// must show regardless of log level.

fn print_profile(input: &Path, profile: &TableProfile) {
    println!("\n{}", "=".repeat(80));
    println!("PROFILE: {}", input.display());
    println!("{}", "=".repeat(80));
    println!("  Rows: {}", profile.row_count);
    println!("  Columns: {}", profile.column_count);
    if profile.headers_synthesized {
        println!("  Headers: generated (no header row detected)");
    }
    println!();

    println!(
        "{:<20} {:<20} {:<10} {:<8} {}",
        "Column", "Type", "Missing %", "Unique", "Summary"
    );
    println!("{}", "-".repeat(80));

    for col in &profile.columns {
        let summary = match &col.statistics {
            ColumnStatistics::Numeric(stats) => format!(
                "mean={} std={} min={} median={} max={}",
                fmt_opt(stats.mean),
                fmt_opt(stats.std),
                fmt_opt(stats.min),
                fmt_opt(stats.median),
                fmt_opt(stats.max)
            ),
            ColumnStatistics::Categorical(stats) => match &stats.mode {
                Some(mode) => format!(
                    "mode='{}' ({}x)",
                    truncate_str(mode, 20),
                    stats.mode_frequency
                ),
                None => String::new(),
            },
            ColumnStatistics::Empty => "all missing".to_string(),
        };
        println!(
            "{:<20} {:<20} {:<10.1} {:<8} {}",
            truncate_str(&col.name, 19),
            col.semantic_type,
            col.missing_percentage,
            col.unique_count,
            summary
        );
    }
    println!();
}

fn print_quality(quality: &QualityReport) {
    println!("DATA QUALITY ISSUES");
    println!("{}", "-".repeat(40));
    if quality.issues.is_empty() {
        println!("  No data quality issues detected");
    } else {
        for issue in &quality.issues {
            match &issue.column {
                Some(column) => println!("  - [{}] {}: {}", issue.issue, column, issue.details),
                None => println!("  - [{}] {}", issue.issue, issue.details),
            }
        }
    }
    println!();
}

fn print_cleaning(report: &CleaningReport) {
    println!("CLEANING");
    println!("{}", "-".repeat(40));
    println!(
        "  Rows: {} -> {}   Columns: {} -> {}",
        report.rows_before, report.rows_after, report.columns_before, report.columns_after
    );
    for entry in &report.entries {
        let marker = match entry.status {
            ConcernStatus::Applied(_) => "+",
            ConcernStatus::Unchanged => "=",
            ConcernStatus::Skipped(_) => "~",
            ConcernStatus::Failed(_) => "!",
        };
        match &entry.column {
            Some(column) => {
                println!("  {} {} [{}]: {}", marker, entry.concern, column, entry.status)
            }
            None => println!("  {} {}: {}", marker, entry.concern, entry.status),
        }
    }
    if report.has_failures() {
        println!("  Some operations failed; the rest of the directive was still applied");
    }
    println!();
}
