use std::path::{Path, PathBuf};

use harvest_logging::harvest_info;

use crate::links::LinkSet;
use crate::persist::{AtomicFileWriter, PersistError};

pub const CSV_HEADER: &str = "PDF Link";
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("input is not a JSON array of link strings: {0}")]
    Serialization(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Single-column CSV built fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    content: String,
    row_count: usize,
}

impl CsvDocument {
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Data rows, excluding the header.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn mime_type(&self) -> &'static str {
        CSV_MIME_TYPE
    }

    pub fn into_string(self) -> String {
        self.content
    }
}

/// Header line, then one quoted row per link. Quotes are doubled; nothing else is escaped.
pub fn to_csv(links: &LinkSet) -> CsvDocument {
    let mut content = String::with_capacity(CSV_HEADER.len() + 1 + links.len() * 32);
    content.push_str(CSV_HEADER);
    content.push('\n');
    for link in links {
        content.push('"');
        content.push_str(&link.replace('"', "\"\""));
        content.push_str("\"\n");
    }
    CsvDocument {
        content,
        row_count: links.len(),
    }
}

pub fn links_to_json(links: &LinkSet) -> Result<String, ExportError> {
    serde_json::to_string_pretty(links.as_slice())
        .map_err(|err| ExportError::Serialization(err.to_string()))
}

pub fn links_from_json(json: &str) -> Result<LinkSet, ExportError> {
    serde_json::from_str::<Vec<String>>(json)
        .map(LinkSet::from)
        .map_err(|err| ExportError::Serialization(err.to_string()))
}

pub fn csv_from_json(json: &str) -> Result<CsvDocument, ExportError> {
    Ok(to_csv(&links_from_json(json)?))
}

/// `pdf-links-{date}.csv`, where `date` is `YYYY-MM-DD`.
pub fn csv_filename(date: &str) -> String {
    format!("pdf-links-{date}.csv")
}

pub fn write_csv(dir: &Path, filename: &str, document: &CsvDocument) -> Result<PathBuf, ExportError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(filename, document.content().as_bytes())?;
    harvest_info!(
        "Wrote {} CSV rows ({}) to {}",
        document.row_count(),
        document.mime_type(),
        path.display()
    );
    Ok(path)
}
