use crate::engine::{BatchReport, Ingested, InputFormat, Rejection};
use crate::models::Transaction;
use crate::schema::TransactionSchema;
use crate::types::RawFields;
use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error, warn};

/// Streams raw records out of a file and validates each one against a shared schema.
pub struct ValidationEngine {
    schema: Arc<TransactionSchema>,
    backpressure: usize
}

impl ValidationEngine {
    /// Creates a new engine that validates against `schema`.
    pub fn new(schema: Arc<TransactionSchema>) -> Self {
        Self {
            schema,
            backpressure: 256
        }
    }

    /// Sets how many decoded records may wait for validation before the reader blocks.
    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    /// Reads every record from `path` and returns the validation outcome of each.
    ///
    /// The format is chosen from the file extension, see [`InputFormat::from_path`].
    pub async fn run(&self, path: &str) -> anyhow::Result<BatchReport> {
        let (sender, receiver) = mpsc::channel::<Ingested>(self.backpressure);
        let reader_handle = self.spawn_reader(PathBuf::from(path), sender);
        let report = self.validate_records(receiver).await;

        if let Err(error) = reader_handle.await {
            error!("Record ingestion failed: {error}");
        }

        Ok(report)
    }

    fn spawn_reader(&self, path: PathBuf, sender: mpsc::Sender<Ingested>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening input at path: {} | {error}", path.display());
                    return;
                }
            };

            match InputFormat::from_path(&path) {
                InputFormat::JsonLines => read_json_lines(BufReader::new(file), &sender),
                InputFormat::Csv => read_csv(BufReader::new(file), &sender)
            }
        })
    }

    async fn validate_records(&self, mut receiver: mpsc::Receiver<Ingested>) -> BatchReport {
        let mut report = BatchReport::default();

        while let Some(ingested) = receiver.recv().await {
            match ingested {
                Ingested::Record { line, fields } => match Transaction::construct(&self.schema, &fields) {
                    Ok(transaction) => {
                        debug!("Record on line [{line}] accepted: {}", transaction.to_json());
                        report.accepted.push(transaction);
                    }
                    Err(error) => {
                        warn!("Record on line [{line}] rejected: {error}");
                        report.rejected.push(Rejection { line, error });
                    }
                },
                Ingested::Malformed { line, reason } => {
                    error!("Malformed input on line [{line}]: {reason}");
                    report.malformed += 1;
                }
            }
        }

        report
    }
}

fn read_json_lines<R: BufRead>(reader: R, sender: &mpsc::Sender<Ingested>) {
    for (index, result) in reader.lines().enumerate() {
        let line = index as u64 + 1;

        let text = match result {
            Ok(text) => text,
            Err(error) => {
                error!("Error reading input on line [{line}]: {error}");
                break;
            }
        };

        if text.trim().is_empty() {
            continue;
        }

        let ingested = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(fields)) => Ingested::Record { line, fields },
            Ok(other) => Ingested::Malformed { line, reason: format!("expected a JSON object, found {other}") },
            Err(error) => Ingested::Malformed { line, reason: error.to_string() }
        };

        if sender.blocking_send(ingested).is_err() {
            break;
        }
    }
}

fn read_csv<R: BufRead>(reader: R, sender: &mpsc::Sender<Ingested>) {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(error) => {
            error!("CSV header error: {error}");
            return;
        }
    };

    for (index, result) in reader.records().enumerate() {
        //NOTE: Line 1 is the header row, quoted cells may span lines so prefer the reader's position
        let fallback_line = index as u64 + 2;

        let ingested = match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |position| position.line());

                //NOTE: CSV cannot express null, so a blank cell is an absent key; other cells stay verbatim
                let fields: RawFields = headers.iter()
                    .zip(record.iter())
                    .filter(|(_, cell)| !cell.trim().is_empty())
                    .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
                    .collect();

                Ingested::Record { line, fields }
            }
            Err(error) => {
                let line = error.position().map_or(fallback_line, |position| position.line());
                Ingested::Malformed { line, reason: error.to_string() }
            }
        };

        if sender.blocking_send(ingested).is_err() {
            break;
        }
    }
}
