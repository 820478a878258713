//! Writing a generated icon set to an archive.

use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;
use crate::icon::IconSet;
use crate::manifest::Manifest;

/// Name of the manifest entry written after the icons.
pub const MANIFEST_FILE_NAME: &str = "icons.json";

/// Destination for generated files.
pub trait ArchiveSink {
    /// Stores `bytes` under the relative `path`.
    fn add(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError>;
}

/// Zip archive sink with deflated entries.
pub struct ZipSink<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Writes the central directory and returns the underlying writer.
    pub fn finish(self) -> Result<W, ArchiveError> {
        self.zip.finish().map_err(|source| ArchiveError::Zip {
            path: "<central directory>".to_string(),
            source,
        })
    }
}

impl<W: Write + Seek> ArchiveSink for ZipSink<W> {
    fn add(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.zip
            .start_file(path, self.options)
            .map_err(|source| ArchiveError::Zip {
                path: path.to_string(),
                source,
            })?;
        self.zip.write_all(bytes).map_err(|source| ArchiveError::Io {
            path: path.to_string(),
            source,
        })
    }
}

/// Writes every icon under its relative path, then the manifest as
/// `icons.json`.
pub fn write_icon_set<S: ArchiveSink + ?Sized>(
    sink: &mut S,
    icons: &IconSet,
    manifest: &Manifest,
) -> Result<(), ArchiveError> {
    for icon in icons {
        sink.add(icon.relative_path(), icon.bytes())?;
    }
    let json = manifest.to_json_pretty()?;
    sink.add(MANIFEST_FILE_NAME, json.as_bytes())?;

    tracing::debug!(entries = icons.len() + 1, "Wrote icon set");
    Ok(())
}
