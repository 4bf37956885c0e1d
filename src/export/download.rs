//! Download handoff - the `{filename, mime_type, content}` triple and the
//! host-side sinks that save it.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::info;

/// MIME type of CSV exports.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid download filename: {0:?}")]
    InvalidFilename(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An in-memory file ready to be handed to the host's download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl Download {
    pub fn csv(filename: impl Into<String>, content: String) -> Self {
        Self {
            filename: filename.into(),
            mime_type: CSV_MIME_TYPE.to_string(),
            content: content.into_bytes(),
        }
    }

    /// Render as a `data:` URL for hosts that trigger downloads from a link.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.content))
    }

    /// Content as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Host-side receiver of finished downloads.
pub trait DownloadSink {
    type Receipt;

    fn deliver(&self, download: &Download) -> Result<Self::Receipt, ExportError>;
}

/// Saves downloads as files under a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn validate_filename(name: &str) -> Result<(), ExportError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(ExportError::InvalidFilename(name.to_string()));
    }
    Ok(())
}

impl DownloadSink for DirectorySink {
    type Receipt = PathBuf;

    fn deliver(&self, download: &Download) -> Result<PathBuf, ExportError> {
        validate_filename(&download.filename)?;
        let path = self.dir.join(&download.filename);
        fs::write(&path, &download.content).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = download.content.len(), "download saved");
        Ok(path)
    }
}
