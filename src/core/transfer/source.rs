//! Transfer sources
//!
//! Sources are enumerated up front so a missing directory fails the whole
//! command, while unreadable or malformed individual files only fail their own
//! item later.

use crate::domain::{FerryError, Resource, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the items of a transfer come from
#[derive(Debug, Clone)]
pub enum TransferSource {
    /// Every `*.json` file directly inside the directory, sorted by name
    Directory(PathBuf),

    /// Explicit files, in the given order
    Files(Vec<PathBuf>),

    /// Resources already in memory (search results, converted CSV rows)
    Resources(Vec<Resource>),
}

/// One unit of work
#[derive(Debug, Clone)]
pub enum TransferItem {
    File(PathBuf),
    Resource(Resource),
}

impl TransferItem {
    /// Name used for the item in outcomes and logs
    pub fn label(&self) -> String {
        match self {
            TransferItem::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            TransferItem::Resource(resource) => resource.reference(),
        }
    }
}

impl TransferSource {
    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            TransferSource::Directory(dir) => format!("directory {}", dir.display()),
            TransferSource::Files(files) => format!("{} file(s)", files.len()),
            TransferSource::Resources(resources) => format!("{} resource(s)", resources.len()),
        }
    }

    /// Enumerate the items
    ///
    /// # Errors
    ///
    /// Returns [`FerryError::Io`] if a directory source does not exist or
    /// cannot be listed, or an explicit file does not exist.
    pub fn into_items(self) -> Result<Vec<TransferItem>> {
        match self {
            TransferSource::Directory(dir) => Ok(scan_directory(&dir)?
                .into_iter()
                .map(TransferItem::File)
                .collect()),
            TransferSource::Files(files) => {
                if let Some(missing) = files.iter().find(|f| !f.is_file()) {
                    return Err(FerryError::Io(format!(
                        "File not found: {}",
                        missing.display()
                    )));
                }
                Ok(files.into_iter().map(TransferItem::File).collect())
            }
            TransferSource::Resources(resources) => {
                Ok(resources.into_iter().map(TransferItem::Resource).collect())
            }
        }
    }
}

/// List the `*.json` files directly inside `dir`, sorted by file name
///
/// Sub-directories are not descended into.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FerryError::Io(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        FerryError::Io(format!("Failed to read directory {}: {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| FerryError::Io(format!("Failed to read directory entry: {e}")))?
            .path();
        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
        if path.is_file() && is_json {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
