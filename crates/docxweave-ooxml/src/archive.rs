//! OPC package (ZIP) output
//!
//! Entries are written in the order [`PartManager::entries`] yields them,
//! each stamped with the same fixed modification time, so equal documents
//! produce byte-identical archives.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::info;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::config::Compression;
use crate::error::{DocxError, Result};
use crate::parts::PartManager;

/// Writes a [`PartManager`] as a ZIP package
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageWriter {
    compression: Compression,
}

impl PackageWriter {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression.method())
            .last_modified_time(zip::DateTime::default())
    }

    /// Write the package to any seekable writer
    pub fn write_to<W: Write + Seek>(&self, parts: &PartManager, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = self.options();

        for (name, data) in parts.entries() {
            zip.start_file(name, options)?;
            zip.write_all(&data)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write the package into memory
    pub fn to_bytes(&self, parts: &PartManager) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(parts, &mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the package to `path` atomically
    ///
    /// The archive is built in memory, written to a temporary file next to
    /// `path` and renamed into place. On failure nothing appears at `path`
    /// and an existing file there is left as it was.
    ///
    /// A replaced file keeps its permissions. A new file gets the same mode
    /// a plain create would, after the process umask.
    pub fn write_to_file(&self, parts: &PartManager, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(parts)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let package_error = |source: std::io::Error| DocxError::PackageWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut builder = Builder::new();
        builder.prefix(".docxweave");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir).map_err(package_error)?;
        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(package_error)?;
        }
        tmp.write_all(&bytes).map_err(package_error)?;
        tmp.as_file().sync_all().map_err(package_error)?;
        tmp.persist(path).map_err(|e| package_error(e.error))?;

        info!(path = %path.display(), bytes = bytes.len(), "wrote package");
        Ok(())
    }
}
