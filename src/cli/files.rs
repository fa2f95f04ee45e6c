//! Resolution of upload arguments into local document files.

use crate::backend::UploadFile;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

/// Whether `path` has one of the supported document extensions.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(extension))
        })
}

/// Expand files and directories into the list of files to upload.
///
/// Explicit file arguments are kept as given, whatever their extension, so the service can
/// report unsupported formats per file. Directories are walked recursively and only supported
/// documents are kept, sorted by path.
pub fn collect_upload_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| is_supported(path))
                .collect();
            found.sort();
            tracing::debug!(directory = %input.display(), files = found.len(), "Expanded upload directory");
            paths.extend(found);
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            bail!("{} does not exist", input.display());
        }
    }
    Ok(paths)
}

/// Read every path into memory in order.
pub async fn load_upload_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}
