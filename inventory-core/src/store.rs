//! Persistent record store.
//!
//! The store is keyed by inventory number. Allocation reads a snapshot of
//! the known identifiers; a finished batch is merged back with
//! last-write-wins per identifier.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::record::{AssetRecord, Field};
use crate::table;

/// File name of the inventory table inside the output directory.
pub const STORE_FILE: &str = "Inventar_DB.csv";

pub trait RecordStore {
    /// Snapshot of every identifier currently stored.
    fn existing_identifiers(&self) -> HashSet<String>;

    /// Append `records`, then keep only the last row per identifier.
    fn merge(&mut self, records: &[AssetRecord]) -> Result<(), StoreError>;
}

/// Concatenate and deduplicate, keeping the last occurrence of each
/// identifier at the position of that occurrence.
pub fn merge_records(old: Vec<AssetRecord>, new: &[AssetRecord]) -> Vec<AssetRecord> {
    let all: Vec<AssetRecord> = old.into_iter().chain(new.iter().cloned()).collect();
    let mut last: HashMap<String, usize> = HashMap::new();
    for (i, rec) in all.iter().enumerate() {
        last.insert(rec.identifier().to_string(), i);
    }
    all.into_iter()
        .enumerate()
        .filter(|(i, rec)| last.get(rec.identifier()) == Some(i))
        .map(|(_, rec)| rec)
        .collect()
}

/// Store backed by a CSV file with the six column headers.
#[derive(Clone, Debug)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/Inventar_DB.csv`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored rows. A missing or unreadable file yields an empty store.
    pub fn load(&self) -> Vec<AssetRecord> {
        if !self.path.exists() {
            return Vec::new();
        }
        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|text| table::parse_table(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "inventory store {} unreadable, treating as empty: {e}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    fn write_all(&self, records: &[AssetRecord]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer.write_record(Field::ALL.map(Field::column))?;
            for rec in records {
                writer.write_record(rec.to_row())?;
            }
            writer.flush()?;
        }
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn existing_identifiers(&self) -> HashSet<String> {
        self.load()
            .iter()
            .filter(|r| r.has_identifier())
            .map(|r| r.identifier().to_string())
            .collect()
    }

    fn merge(&mut self, records: &[AssetRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let merged = merge_records(self.load(), records);
        self.write_all(&merged)?;
        debug!(
            "inventory store {} now holds {} record(s)",
            self.path.display(),
            merged.len()
        );
        Ok(())
    }
}

/// In-process store for tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Vec<AssetRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }
}

impl RecordStore for MemoryStore {
    fn existing_identifiers(&self) -> HashSet<String> {
        self.records
            .iter()
            .filter(|r| r.has_identifier())
            .map(|r| r.identifier().to_string())
            .collect()
    }

    fn merge(&mut self, records: &[AssetRecord]) -> Result<(), StoreError> {
        let old = std::mem::take(&mut self.records);
        self.records = merge_records(old, records);
        Ok(())
    }
}
