use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accounting::expense::{Category, ExpenseRecord};
use crate::accounting::ledger::Ledger;
use crate::accounting::ValidationError;

pub const DEFAULT_DATA_FILE: &str = "data_pengeluaran.csv";
pub const EXPORT_FILE_NAME: &str = "laporan_pengeluaran.csv";
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

const HEADER: [&str; 4] = ["Tanggal", "Jumlah", "Kategori", "Deskripsi"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum RecordDataError {
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("invalid record on line {line}: {source}")]
    InvalidRecord {
        line: u64,
        #[source]
        source: RecordDataError,
    },
}

/// One row of the data file.
#[derive(Debug, Deserialize, Serialize)]
pub struct StoredRecord {
    #[serde(rename = "Tanggal")]
    pub date: String,
    #[serde(rename = "Jumlah")]
    pub amount: String,
    #[serde(rename = "Kategori")]
    pub category: Category,
    #[serde(rename = "Deskripsi", default)]
    pub description: Option<String>,
}

impl From<&ExpenseRecord> for StoredRecord {
    fn from(record: &ExpenseRecord) -> Self {
        StoredRecord {
            date: record.date().format(DATE_FORMAT).to_string(),
            amount: record.amount().to_string(),
            category: record.category(),
            description: record.description().clone(),
        }
    }
}

impl TryFrom<StoredRecord> for ExpenseRecord {
    type Error = RecordDataError;

    fn try_from(row: StoredRecord) -> Result<Self, Self::Error> {
        let date = parse_date(&row.date).ok_or(RecordDataError::InvalidDate(row.date))?;
        let amount = Decimal::from_str(row.amount.trim()).map_err(|_| RecordDataError::InvalidAmount(row.amount))?;

        Ok(ExpenseRecord::new(date, amount, row.category, row.description)?)
    }
}

/// Dates are written as `YYYY-MM-DD`; older files may carry a midnight time
/// component, which is dropped.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map(|moment| moment.date()))
        .ok()
}

/// Where an export is written.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportTarget {
    Stdout,
    File(PathBuf),
}

impl ExportTarget {
    /// `-` means standard output, anything else is a file path.
    pub fn from_arg(path: Option<PathBuf>) -> ExportTarget {
        match path {
            Some(path) if path.as_os_str() == "-" => ExportTarget::Stdout,
            Some(path) => ExportTarget::File(path),
            None => ExportTarget::File(PathBuf::from(EXPORT_FILE_NAME)),
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::Stdout => f.write_str("standard output"),
            ExportTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The CSV file holding the ledger.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> LedgerStore {
        LedgerStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or empty file is an empty ledger.
    pub fn load(&self) -> Result<Ledger, StoreError> {
        if !self.path.exists() {
            debug!("no data file at {}, starting empty", self.path.display());
            return Ok(Ledger::new());
        }

        let file = File::open(&self.path)?;
        let ledger = read_ledger(file)?;
        debug!("loaded {} record(s) from {}", ledger.len(), self.path.display());

        Ok(ledger)
    }

    /// Writes the whole ledger to a sibling temporary file and renames it
    /// over the data file, so the previous contents survive a failed write.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("csv.tmp");
        let result = write_synced(ledger, &temp_path)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(StoreError::from));
        if let Err(err) = result {
            match fs::remove_file(&temp_path) {
                Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                    warn!("failed to remove {}: {}", temp_path.display(), cleanup);
                },
                _ => {},
            }
            return Err(err);
        }
        debug!("saved {} record(s) to {}", ledger.len(), self.path.display());

        Ok(())
    }

    /// Exports the ledger in the storage format and returns the number of rows.
    pub fn export(&self, ledger: &Ledger, target: &ExportTarget) -> Result<usize, StoreError> {
        match target {
            ExportTarget::Stdout => export_csv(ledger, io::stdout().lock())?,
            ExportTarget::File(path) => export_csv(ledger, BufWriter::new(File::create(path)?))?,
        }
        info!("exported {} record(s) as {} to {}", ledger.len(), EXPORT_MEDIA_TYPE, target);

        Ok(ledger.len())
    }
}

fn write_synced(ledger: &Ledger, path: &Path) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    export_csv(ledger, &mut writer)?;

    let file = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;

    Ok(())
}

pub fn read_ledger<R: io::Read>(reader: R) -> Result<Ledger, StoreError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut ledger = Ledger::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |position| position.line());
        let stored: StoredRecord = row.deserialize(Some(&headers))?;
        let record = ExpenseRecord::try_from(stored).map_err(|source| StoreError::InvalidRecord { line, source })?;
        ledger.append(record);
    }

    Ok(ledger)
}

/// The header row is always written, even for an empty ledger.
pub fn export_csv<W: Write>(ledger: &Ledger, writer: W) -> Result<(), StoreError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for record in ledger.iter() {
        let row: StoredRecord = record.into();
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;

    Ok(())
}
