//! CSV price history file

use super::{HistoryStore, PriceObservation, StorageError};
use chrono::SecondsFormat;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column names, in order
pub const HEADER: [&str; 2] = ["ts", "price"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Appends observations to a CSV file, writing the header once
#[derive(Debug, Clone)]
pub struct CsvHistory {
    path: PathBuf,
    utf8_bom: bool,
}

impl CsvHistory {
    pub fn new(path: impl Into<PathBuf>, utf8_bom: bool) -> Self {
        Self {
            path: path.into(),
            utf8_bom,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for CsvHistory {
    fn append(&self, observation: &PriceObservation) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // A file that exists but holds nothing gets the header too
        let is_new = file.metadata()?.len() == 0;
        if is_new && self.utf8_bom {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record([
            observation
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            observation.price.to_string(),
        ])?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_data()?;

        tracing::debug!(
            path = %self.path.display(),
            price = %observation.price,
            created = is_new,
            "Appended price observation"
        );
        Ok(())
    }
}
