//! JSON codec for vendor documents.
//!
//! Parsing classifies failures so callers can report them per entry.
//! Serialization follows the layout the vendor tools produce: two-space
//! indentation, `" : "` between keys and values, no escaping of `/` or
//! non-ASCII characters.

use std::io;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;

use crate::archive::Entries;
use crate::error::{DocumentErrorKind, Result, TranscodeError};

const BOM: &str = "\u{feff}";

/// Parse one document.
///
/// # Errors
///
/// `MalformedDocument` naming the entry, its size and the failure kind.
pub fn parse(entry: &str, bytes: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(bytes).map_err(|e| TranscodeError::MalformedDocument {
        entry: entry.to_string(),
        size: bytes.len(),
        kind: DocumentErrorKind::Encoding,
        message: e.to_string(),
    })?;
    let text = text.strip_prefix(BOM).unwrap_or(text);

    serde_json::from_str(text).map_err(|e| malformed(entry, bytes.len(), &e))
}

/// Deserialize an already parsed document into a vendor model.
pub fn from_value<T: DeserializeOwned>(entry: &str, size: usize, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| malformed(entry, size, &e))
}

fn malformed(entry: &str, size: usize, err: &serde_json::Error) -> TranscodeError {
    TranscodeError::MalformedDocument {
        entry: entry.to_string(),
        size,
        kind: classify(err),
        message: err.to_string(),
    }
}

fn classify(err: &serde_json::Error) -> DocumentErrorKind {
    match err.classify() {
        Category::Eof => DocumentErrorKind::Truncated,
        Category::Data => DocumentErrorKind::Shape,
        Category::Io => DocumentErrorKind::Syntax,
        Category::Syntax => {
            let message = err.to_string();
            if message.contains("recursion limit") {
                DocumentErrorKind::Depth
            } else if message.contains("control character") {
                DocumentErrorKind::ControlCharacter
            } else if message.contains("unicode") || message.contains("surrogate") {
                DocumentErrorKind::Encoding
            } else {
                DocumentErrorKind::Syntax
            }
        }
    }
}

/// Serialize with the vendor pretty-printing convention.
pub fn to_vendor_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, VendorFormatter::new());
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Pretty formatter writing `"key" : value` with two-space indentation.
pub struct VendorFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl VendorFormatter<'_> {
    pub fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Default for VendorFormatter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for VendorFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// A parsed archive entry.
#[derive(Debug, Clone)]
pub struct Document {
    pub size: usize,
    pub value: Value,
}

/// Every entry of an archive, parsed. Malformed entries are logged and kept
/// aside so the rest of the archive can still be imported.
#[derive(Debug, Default)]
pub struct Documents {
    parsed: IndexMap<String, Document>,
    malformed: IndexMap<String, TranscodeError>,
}

impl Documents {
    /// Parse every `.json` entry; other entries are ignored.
    pub fn decode(entries: &Entries) -> Self {
        let mut documents = Self::default();

        for (name, bytes) in entries {
            if !name.ends_with(".json") {
                tracing::debug!("Ignoring non-JSON entry {}", name);
                continue;
            }
            match parse(name, bytes) {
                Ok(value) => {
                    tracing::debug!("Parsed {} ({} bytes)", name, bytes.len());
                    documents.parsed.insert(
                        name.clone(),
                        Document {
                            size: bytes.len(),
                            value,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    documents.malformed.insert(name.clone(), e);
                }
            }
        }

        documents
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.parsed.get(name)
    }

    /// Deserialize a required entry.
    ///
    /// # Errors
    ///
    /// The entry's own parse error if it was malformed, `MissingEntry` if absent.
    pub fn require<T: DeserializeOwned>(&mut self, name: &str) -> Result<T> {
        if let Some(err) = self.malformed.shift_remove(name) {
            return Err(err);
        }
        let doc = self
            .parsed
            .get(name)
            .ok_or_else(|| TranscodeError::MissingEntry(name.to_string()))?;
        from_value(name, doc.size, doc.value.clone())
    }

    /// Deserialize an optional entry; shape errors are logged and yield `None`.
    pub fn optional<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let doc = self.parsed.get(name)?;
        match from_value(name, doc.size, doc.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    /// Names of parsed entries, in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsed.keys().map(String::as_str)
    }

    /// Names of entries that failed to parse.
    pub fn malformed_names(&self) -> Vec<String> {
        self.malformed.keys().cloned().collect()
    }
}
