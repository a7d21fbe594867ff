//! Archive container I/O.
//!
//! The transcoding core only sees flat `entry name → bytes` maps. This module
//! turns zip files and export directories into such maps and back.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::Result;

/// Archive entries in container order. Names use `/` separators.
pub type Entries = IndexMap<String, Vec<u8>>;

/// Whether `bytes` hold a readable zip archive.
pub fn is_zip(bytes: &[u8]) -> bool {
    ZipArchive::new(Cursor::new(bytes)).is_ok()
}

/// Whether an entry is filesystem metadata added by the archiving tool,
/// such as `__MACOSX/` resource forks or `.DS_Store` files.
pub fn is_os_metadata(name: &str) -> bool {
    name.split('/')
        .any(|part| part == "__MACOSX" || part == ".DS_Store" || part.starts_with("._"))
}

/// Read every file entry of a zip archive.
///
/// Directory entries and OS metadata entries are skipped.
pub fn read_zip(bytes: &[u8]) -> Result<Entries> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Entries::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() || is_os_metadata(file.name()) {
            continue;
        }
        let name = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        entries.insert(name, data);
    }

    Ok(entries)
}

/// Read a directory tree as archive entries named relative to `dir`.
///
/// Entries are sorted by name so the result does not depend on the filesystem.
pub fn read_dir<P: AsRef<Path>>(dir: P) -> Result<Entries> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut entries = Entries::new();
    for (name, path) in files {
        entries.insert(name, fs::read(path)?);
    }
    Ok(entries)
}

fn collect_files(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(String, std::path::PathBuf)>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !is_os_metadata(&name) {
                files.push((name, path));
            }
        }
    }
    Ok(())
}

/// Remove the single top-level folder shared by every entry, if there is one.
///
/// Archives created with `zip -r name.zip name/` wrap everything in `name/`.
/// OS metadata entries are dropped first so they cannot hide the shared folder.
pub fn strip_common_root(entries: Entries) -> Entries {
    let entries: Entries = entries
        .into_iter()
        .filter(|(name, _)| !is_os_metadata(name))
        .collect();
    let root = entries
        .keys()
        .map(|name| name.split_once('/').map(|(first, _)| first))
        .reduce(|a, b| if a == b { a } else { None })
        .flatten()
        .map(str::to_string);

    match root {
        Some(root) => {
            let prefix = format!("{}/", root);
            entries
                .into_iter()
                .map(|(name, data)| (name[prefix.len()..].to_string(), data))
                .collect()
        }
        None => entries,
    }
}

/// Write entries into a deflated zip archive, preserving their order.
pub fn write_zip(entries: &Entries) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, data) in entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Write content to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, contents)
}
