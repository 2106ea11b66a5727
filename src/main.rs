use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use transaction_record::{BatchReport, TransactionSchema, ValidationEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: transaction-record [input].jsonl|csv [log_level:optional] > [output].jsonl");
        eprintln!("Log levels: off, error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2).map_or(LevelFilter::ERROR, |level| parse_log_level(level));

    setup_logging(log_level);

    let schema = Arc::new(TransactionSchema::new());
    let engine = ValidationEngine::new(schema);

    let timer = Instant::now();
    let report = engine.run(path).await?;
    let duration = timer.elapsed();

    info!(
        "Validated {} records in: {duration:?} | accepted: {} | rejected: {} | malformed: {}",
        report.total(),
        report.accepted.len(),
        report.rejected.len(),
        report.malformed
    );

    write_results_to_stdout(&report)?;

    Ok(())
}

/// Maps the optional level argument onto a filter, accepting the names `tracing` understands
/// (`off`, `error` ... `trace`, any case). Unknown names fall back to `error`.
fn parse_log_level(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Unknown log level '{level}', validation diagnostics will be logged at 'error'");
        LevelFilter::ERROR
    })
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Validated records own stdout, rejections and summaries are diagnostics on stderr
    let diagnostics = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(diagnostics)
        .init();
}

fn write_results_to_stdout(report: &BatchReport) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    for transaction in &report.accepted {
        writeln!(output, "{}", transaction.to_json())?;
    }

    output.flush()?;

    Ok(())
}
