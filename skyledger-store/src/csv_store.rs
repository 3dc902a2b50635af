use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use skyledger_core::snapshot::{SnapshotStore, StoreError};

/// File-backed snapshot store: one CSV file per collection, rewritten
/// wholesale (header plus every row) on each save. A missing file loads as
/// an empty collection, so first boot needs no provisioning step. There is
/// no partial-write recovery; the design assumes a single process owns the
/// file at a time.
pub struct CsvStore<R> {
    path: PathBuf,
    _marker: PhantomData<fn() -> R>,
}

impl<R> CsvStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R> SnapshotStore<R> for CsvStore<R>
where
    R: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Result<Vec<R>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Store file missing, starting empty: {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    fn save(&self, rows: &[R]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
