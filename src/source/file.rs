//! File-based data source.
//!
//! Polls a JSON file for sync batches.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use infragraph_transformers::SyncBatch;

use super::{parse_batches, DataSource};

/// A data source that reads sync batches from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated, so each write is transformed
/// once.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<Vec<SyncBatch>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match parse_batches(&content) {
                Ok(batches) => {
                    self.last_error = None;
                    Some(batches)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Vec<SyncBatch>> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(batches) = self.read_file() {
                self.last_modified = current_modified;
                return Some(batches);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
