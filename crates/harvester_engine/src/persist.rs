use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use harvest_logging::harvest_info;
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

use crate::Record;

pub const DEFAULT_RECORDS_FILENAME: &str = "records.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("could not serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes whole artifacts to `{dir}/{filename}` through a temp file and a rename,
/// so readers never observe a partially written file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = Builder::new().prefix(".harvester-").tempfile_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Windows refuses to rename over an existing file.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Receives the complete harvest result once, at the end of a successful run.
pub trait RecordSink: Send + Sync {
    /// Returns the written location, if the sink has one.
    fn persist(&self, records: Vec<Record>) -> Result<Option<PathBuf>, PersistError>;
}

/// Writes the harvest result as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    writer: AtomicFileWriter,
    filename: String,
}

impl JsonFileSink {
    pub fn new(dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            filename: filename.into(),
        }
    }

    pub fn target(&self) -> PathBuf {
        self.writer.dir().join(&self.filename)
    }
}

impl RecordSink for JsonFileSink {
    fn persist(&self, records: Vec<Record>) -> Result<Option<PathBuf>, PersistError> {
        let content = serde_json::to_string_pretty(&records)?;
        let path = self.writer.write(&self.filename, content.as_bytes())?;
        harvest_info!("Wrote {} records to {}", records.len(), path.display());
        Ok(Some(path))
    }
}
