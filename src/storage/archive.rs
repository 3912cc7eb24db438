//! Readers for exported probe archives
//!
//! An export is a set of named JSON documents. It usually comes as a zip
//! file, but an unpacked directory with the same entry names works too.

use crate::core::error::{ProbeError, ProbeResult};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// Named-entry access to an export
pub trait ArchiveReader {
    /// Human-readable name used in errors and logs
    fn name(&self) -> &str;

    /// Content of an entry, `None` when the export has no such entry
    fn read_entry(&mut self, entry: &str) -> ProbeResult<Option<String>>;
}

fn load_failure(source_name: &str, message: impl Into<String>) -> ProbeError {
    ProbeError::LoadFailure {
        source_name: source_name.to_string(),
        message: message.into(),
    }
}

/// Zip export file
pub struct ZipArchiveReader {
    name: String,
    archive: ZipArchive<File>,
}

impl ZipArchiveReader {
    pub fn open(path: &Path) -> ProbeResult<Self> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| load_failure(&name, e.to_string()))?;
        let archive = ZipArchive::new(file).map_err(|e| load_failure(&name, e.to_string()))?;
        Ok(Self { name, archive })
    }
}

impl ArchiveReader for ZipArchiveReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_entry(&mut self, entry: &str) -> ProbeResult<Option<String>> {
        match self.archive.by_name(entry) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| load_failure(&self.name, format!("{}: {}", entry, e)))?;
                Ok(Some(content))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(load_failure(&self.name, format!("{}: {}", entry, e))),
        }
    }
}

/// Unpacked export directory
pub struct DirectoryReader {
    name: String,
    root: PathBuf,
}

impl DirectoryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: root.display().to_string(),
            root,
        }
    }
}

impl ArchiveReader for DirectoryReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_entry(&mut self, entry: &str) -> ProbeResult<Option<String>> {
        let path = self.root.join(entry);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| load_failure(&self.name, format!("{}: {}", entry, e)))
    }
}

/// In-memory documents keyed by entry name
impl ArchiveReader for HashMap<String, String> {
    fn name(&self) -> &str {
        "in-memory export"
    }

    fn read_entry(&mut self, entry: &str) -> ProbeResult<Option<String>> {
        Ok(self.get(entry).cloned())
    }
}

/// Open a zip file or an unpacked export directory
pub fn open_archive(path: &Path) -> ProbeResult<Box<dyn ArchiveReader>> {
    if path.is_dir() {
        Ok(Box::new(DirectoryReader::new(path)))
    } else {
        Ok(Box::new(ZipArchiveReader::open(path)?))
    }
}
