//! Sequential assessment of vitals read from CSV.

use std::{io, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    engine::PredictClient,
    store::{self, Store, SubmitOutcome},
    vitals::VitalField,
};

/// One line of the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub row: usize,
    pub prediction: Option<i64>,
    pub probability: Option<f64>,
    pub risk_level: Option<String>,
    pub error: Option<String>,
}

impl BatchRow {
    fn failed(row: usize, message: String) -> Self {
        Self {
            row,
            prediction: None,
            probability: None,
            risk_level: None,
            error: Some(message),
        }
    }
}

/// Assess each record of `input`, one request at a time.
///
/// Columns are matched to vitals by wire name or snake_case alias; other
/// columns (such as `Outcome`) are ignored and missing vitals keep the form
/// defaults, as do cells missing from a short record. A record the CSV
/// reader cannot decode is reported with an `error` and the batch carries on.
/// `row` is 1-based and counts data records only.
pub async fn assess_csv<R: io::Read>(input: R, client: &PredictClient) -> Result<Vec<BatchRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let columns: Vec<(usize, VitalField)> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| VitalField::from_wire(name).map(|f| (idx, f)))
        .collect();
    if columns.is_empty() {
        warn!("no vital columns recognised; every row uses form defaults");
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(row = idx + 1, %err, "skipping unreadable CSV record");
                rows.push(BatchRow::failed(idx + 1, format!("unreadable record: {err}")));
                continue;
            }
        };
        let mut store = Store::new();
        store.start()?;
        for (col, field) in &columns {
            if let Some(raw) = record.get(*col) {
                store.update_field(field.wire_name(), raw)?;
            }
        }

        let shared = Mutex::new(store);
        let outcome = store::submit(&shared, client, Duration::ZERO).await?;
        let store = shared.into_inner();
        let row = match (outcome, store.result()) {
            (SubmitOutcome::Predicted, Some(result)) => BatchRow {
                row: idx + 1,
                prediction: Some(result.prediction),
                probability: Some(result.probability),
                risk_level: Some(result.risk_level.clone()),
                error: None,
            },
            (SubmitOutcome::Failed(message), _) => BatchRow::failed(idx + 1, message),
            _ => BatchRow::failed(idx + 1, "cancelled".to_string()),
        };
        rows.push(row);
    }

    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    info!(rows = rows.len(), failed, "batch assessment finished");
    Ok(rows)
}

/// Write the report as CSV with a header line.
pub fn write_report<W: io::Write>(rows: &[BatchRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_report_to_path(rows: &[BatchRow], path: &Path) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_report(rows, file)?;
    info!(path = %path.display(), count = rows.len(), "saved batch report");
    Ok(())
}
