//! Record loading service
//!
//! Reads flat adjacency-list records from TOML or JSON files and turns them
//! into forests.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{list_to_tree, validate_records, Forest, Record, RecordFile};
use crate::infrastructure::traits::FileSystem;

/// Supported records file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Toml,
    Json,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(RecordFormat::Toml),
            "json" => Some(RecordFormat::Json),
            _ => None,
        }
    }
}

/// Service for loading records through the filesystem boundary.
pub struct RecordService {
    fs: Arc<dyn FileSystem>,
}

impl RecordService {
    /// Create a new record service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load records in file order.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Record>> {
        let format = RecordFormat::from_path(path)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))?;
        if !self.fs.is_file(path) {
            return Err::<Vec<Record>, _>(io::Error::new(io::ErrorKind::NotFound, "no such file"))
                .with_path_context("read records", path);
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read records", path)?;
        let records = Self::parse(&content, format).map_err(|message| ApplicationError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(count = records.len(), "records loaded");
        Ok(records)
    }

    /// Parse records from a string in the given format.
    pub fn parse(content: &str, format: RecordFormat) -> Result<Vec<Record>, String> {
        match format {
            RecordFormat::Toml => toml::from_str::<RecordFile>(content)
                .map(|file| file.records)
                .map_err(|e| e.to_string()),
            RecordFormat::Json => {
                serde_json::from_str::<Vec<Record>>(content).map_err(|e| e.to_string())
            }
        }
    }

    /// Load records and link them into a forest.
    ///
    /// With `strict`, duplicate ids and orphan records are reported as errors
    /// instead of being resolved silently.
    pub fn load_forest(&self, path: &Path, strict: bool) -> ApplicationResult<Forest<Record>> {
        let records = self.load(path)?;
        if strict {
            validate_records(&records, Record::key, Record::parent_key)?;
        }
        Ok(list_to_tree(records, Record::key, Record::parent_key))
    }
}
