//! Loading measurement tables from disk.

use anyhow::Context;
use flate2::read::GzDecoder;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use wb_core::measurement::MeasurementTable;
use wb_core::Measurement;

/// Read a measurement CSV, gunzipping it when the file name ends in `.gz`.
pub fn load_measurements(path: &Path) -> anyhow::Result<MeasurementTable> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let table = read_measurements(BufReader::new(file), gzipped)
        .with_context(|| format!("Failed to read measurements from {}", path.display()))?;
    info!(
        "Loaded {} measurements from {}",
        table.measurements.len(),
        path.display()
    );
    if table.skipped_rows > 0 {
        warn!(
            "{} rows in {} had no usable date",
            table.skipped_rows,
            path.display()
        );
    }
    Ok(table)
}

pub fn read_measurements<R: Read>(reader: R, gzipped: bool) -> anyhow::Result<MeasurementTable> {
    let table = if gzipped {
        Measurement::read_csv(GzDecoder::new(reader))?
    } else {
        Measurement::read_csv(reader)?
    };
    Ok(table)
}
