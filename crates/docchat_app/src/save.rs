//! Archive save side effect: the desktop stand-in for the browser's
//! download mechanism.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use docchat_transport::DEFAULT_ARCHIVE_NAME;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("download directory missing or not writable: {0}")]
    DownloadDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the download directory exists; create if missing.
pub fn ensure_download_dir(dir: &Path) -> Result<(), SaveError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| SaveError::DownloadDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(SaveError::DownloadDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| SaveError::DownloadDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| SaveError::DownloadDir(e.to_string()))?;
    Ok(())
}

/// Writes archives into a download directory via a temp file then rename, so
/// a crash mid-write never leaves a partial archive behind.
pub struct ArchiveWriter {
    dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Saves `bytes` as `filename` inside the download directory. The name is
    /// reduced to a bare file name first; a server-suggested name can never
    /// escape the directory.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, SaveError> {
        ensure_download_dir(&self.dir)?;

        let target = self.dir.join(sanitize_filename(filename));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace any archive from an earlier submission with the same name.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| SaveError::Io(e.error))?;
        Ok(target)
    }
}

fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        DEFAULT_ARCHIVE_NAME.to_string()
    } else {
        cleaned
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}')
}
