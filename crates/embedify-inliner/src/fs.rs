//! File system capability.
//!
//! The engine never touches `std::fs` directly. Hosts that keep files
//! somewhere else implement [`FileSystem`].

use std::{fs, io, path::Path};

use crate::error::{InlineError, Result};

/// The file operations the engine needs from its host.
pub trait FileSystem {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read a file as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write bytes to a file, replacing any previous content.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Create a directory and all of its parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Read a referenced text file, mapping failures to [`InlineError::Read`].
pub(crate) fn read_text(fs: &impl FileSystem, path: &Path) -> Result<String> {
    fs.read_to_string(path)
        .map_err(|e| InlineError::read(path, e))
}

/// Replace the file at `path` with `contents`.
///
/// Any previous file is removed first and missing parent directories are created.
pub fn write_document(fs: &impl FileSystem, path: &Path, contents: &str) -> Result<()> {
    if fs.exists(path) {
        fs.remove_file(path)
            .map_err(|e| InlineError::write(path, e))?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)
            .map_err(|e| InlineError::write(parent, e))?;
    }

    fs.write(path, contents.as_bytes())
        .map_err(|e| InlineError::write(path, e))
}
