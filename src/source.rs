//! Raw inputs and outputs of a conversion.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{self, Entries};
use crate::error::Result;

/// What was read from `--source`.
#[derive(Debug, Clone)]
pub enum Source {
    /// A zip file or an export directory.
    Archive(Entries),
    /// A single JSON document.
    Document { name: String, bytes: Vec<u8> },
}

impl Source {
    /// Read a directory, a zip file, or any other file as a single document.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.is_dir() {
            tracing::debug!("Reading export directory {}", path.display());
            return Ok(Source::Archive(archive::read_dir(path)?));
        }

        let bytes = fs::read(path)?;
        if archive::is_zip(&bytes) {
            tracing::debug!("Reading zip archive {}", path.display());
            return Ok(Source::Archive(archive::read_zip(&bytes)?));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Source::Document { name, bytes })
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Source::Archive(_))
    }

    /// Whether the archive holds a root entry named `name`.
    pub fn has_entry(&self, name: &str) -> bool {
        match self {
            Source::Archive(entries) => entries.contains_key(name),
            Source::Document { .. } => false,
        }
    }
}

/// Serialized result of an export.
#[derive(Debug, Clone)]
pub enum Output {
    Document(Vec<u8>),
    Archive(Entries),
}

impl Output {
    /// File extension appended to the export base name.
    pub fn extension(&self) -> &'static str {
        match self {
            Output::Document(_) => "json",
            Output::Archive(_) => "zip",
        }
    }

    /// Write to `<base>.json` or `<base>.zip` and return the written path.
    /// A base that already carries the extension is used as is.
    pub fn write<P: AsRef<Path>>(&self, base: P) -> Result<PathBuf> {
        let base = base.as_ref();
        let path = if base.extension().is_some_and(|ext| ext == self.extension()) {
            base.to_path_buf()
        } else {
            let mut name = OsString::from(base.as_os_str());
            name.push(".");
            name.push(self.extension());
            PathBuf::from(name)
        };

        match self {
            Output::Document(bytes) => archive::write_file(&path, bytes)?,
            Output::Archive(entries) => archive::write_file(&path, archive::write_zip(entries)?)?,
        }
        Ok(path)
    }
}
