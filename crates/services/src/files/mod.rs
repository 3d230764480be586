//! Filesystem access confined beneath an optional base directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use config::FilesystemServerConfig;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FileError {
    /// The requested path resolves outside the configured base directory.
    #[error("access to paths outside of {base} is not allowed")]
    OutsideBasePath { base: String },

    #[error("path not found: {path}")]
    NotFound { path: String },

    /// A file read was attempted on a directory.
    #[error("cannot read a directory: {path}")]
    IsDirectory { path: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// File size in bytes. Absent for directories.
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

/// File content plus the encoding it is delivered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
    /// Either `utf-8` or `base64`.
    pub encoding: String,
}

/// Filesystem operations, each gated by the base-path containment check.
#[derive(Debug, Clone, Default)]
pub struct FileAccess {
    base_path: Option<PathBuf>,
}

impl FileAccess {
    pub fn new(base_path: Option<PathBuf>) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &FilesystemServerConfig) -> Self {
        Self::new(config.base_path.clone())
    }

    /// Absolutize a requested path and enforce base-path containment.
    ///
    /// Normalization is lexical: `..` components are folded without
    /// following symlinks.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, FileError> {
        let resolved = absolutize(Path::new(requested))?;

        if let Some(base) = &self.base_path {
            let base = absolutize(base)?;
            if !resolved.starts_with(&base) {
                debug!(path = %resolved.display(), "rejected path outside base directory");
                return Err(FileError::OutsideBasePath {
                    base: base.display().to_string(),
                });
            }
        }

        Ok(resolved)
    }

    /// List a directory, optionally walking the whole tree beneath it.
    pub fn list(&self, requested: &str, recursive: bool) -> Result<Vec<FileEntry>, FileError> {
        let path = self.resolve(requested)?;
        if !path.exists() {
            return Err(FileError::NotFound {
                path: requested.to_string(),
            });
        }

        let mut entries = Vec::new();
        if recursive {
            walk(&path, &mut entries)?;
        } else {
            read_dir_entries(&path, &mut entries)?;
        }
        Ok(entries)
    }

    /// Read a file as UTF-8 text, falling back to base64 for binary content.
    ///
    /// Passing `Some("base64")` forces base64 output; any other requested
    /// encoding attempts UTF-8 first.
    pub fn read(&self, requested: &str, encoding: Option<&str>) -> Result<FileContent, FileError> {
        let path = self.resolve(requested)?;
        if !path.exists() {
            return Err(FileError::NotFound {
                path: requested.to_string(),
            });
        }
        if path.is_dir() {
            return Err(FileError::IsDirectory {
                path: requested.to_string(),
            });
        }

        let bytes = fs::read(&path)?;
        if encoding == Some("base64") {
            return Ok(FileContent {
                content: BASE64.encode(&bytes),
                encoding: "base64".to_string(),
            });
        }

        match String::from_utf8(bytes) {
            Ok(text) => Ok(FileContent {
                content: text,
                encoding: "utf-8".to_string(),
            }),
            Err(err) => Ok(FileContent {
                content: BASE64.encode(err.into_bytes()),
                encoding: "base64".to_string(),
            }),
        }
    }
}

/// Absolutize against the working directory and fold `.`/`..` components.
fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

fn entry_for(path: &Path, metadata: &fs::Metadata) -> FileEntry {
    let is_dir = metadata.is_dir();
    FileEntry {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        is_dir,
        size: (!is_dir).then(|| metadata.len()),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
    }
}

fn read_dir_entries(dir: &Path, out: &mut Vec<FileEntry>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        out.push(entry_for(&entry.path(), &metadata));
    }
    Ok(())
}

fn walk(dir: &Path, out: &mut Vec<FileEntry>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let path = entry.path();
        let is_dir = metadata.is_dir();
        out.push(entry_for(&path, &metadata));
        if is_dir {
            walk(&path, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn fixture() -> (tempfile::TempDir, FileAccess) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut file = File::create(dir.path().join("notes.txt")).unwrap();
        file.write_all(b"hello world").unwrap();
        let mut nested = File::create(dir.path().join("sub/inner.txt")).unwrap();
        nested.write_all(b"nested").unwrap();
        let access = FileAccess::new(Some(dir.path().to_path_buf()));
        (dir, access)
    }

    #[test]
    fn resolve_rejects_paths_outside_the_base() {
        let (_dir, access) = fixture();
        let err = access.resolve("/etc/passwd").unwrap_err();
        assert!(matches!(err, FileError::OutsideBasePath { .. }));
    }

    #[test]
    fn resolve_rejects_parent_traversal() {
        let (dir, access) = fixture();
        let sneaky = format!("{}/sub/../../outside.txt", dir.path().display());
        let err = access.resolve(&sneaky).unwrap_err();
        assert!(matches!(err, FileError::OutsideBasePath { .. }));
    }

    #[test]
    fn resolve_allows_anything_without_a_base() {
        let access = FileAccess::new(None);
        assert!(access.resolve("/etc").is_ok());
    }

    #[test]
    fn list_returns_direct_entries() {
        let (dir, access) = fixture();
        let entries = access
            .list(dir.path().to_str().unwrap(), false)
            .unwrap();

        assert_eq!(entries.len(), 2);
        let file = entries.iter().find(|e| e.name == "notes.txt").unwrap();
        assert!(!file.is_dir);
        assert_eq!(file.size, Some(11));
        assert!(file.modified.is_some());
        let sub = entries.iter().find(|e| e.name == "sub").unwrap();
        assert!(sub.is_dir);
        assert_eq!(sub.size, None);
    }

    #[test]
    fn recursive_list_includes_nested_files() {
        let (dir, access) = fixture();
        let entries = access.list(dir.path().to_str().unwrap(), true).unwrap();
        assert!(entries.iter().any(|e| e.name == "inner.txt"));
    }

    #[test]
    fn list_of_missing_path_is_not_found() {
        let (dir, access) = fixture();
        let missing = format!("{}/absent", dir.path().display());
        let err = access.list(&missing, false).unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }));
    }

    #[test]
    fn read_returns_utf8_text() {
        let (dir, access) = fixture();
        let path = format!("{}/notes.txt", dir.path().display());
        let content = access.read(&path, None).unwrap();
        assert_eq!(content.content, "hello world");
        assert_eq!(content.encoding, "utf-8");
    }

    #[test]
    fn read_falls_back_to_base64_for_binary() {
        let (dir, access) = fixture();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x01]).unwrap();

        let content = access.read(path.to_str().unwrap(), None).unwrap();
        assert_eq!(content.encoding, "base64");
        assert_eq!(content.content, BASE64.encode([0xff, 0xfe, 0x00, 0x01]));
    }

    #[test]
    fn read_honors_explicit_base64_request() {
        let (dir, access) = fixture();
        let path = format!("{}/notes.txt", dir.path().display());
        let content = access.read(&path, Some("base64")).unwrap();
        assert_eq!(content.encoding, "base64");
        assert_eq!(content.content, BASE64.encode(b"hello world"));
    }

    #[test]
    fn read_of_directory_is_rejected() {
        let (dir, access) = fixture();
        let err = access.read(dir.path().to_str().unwrap(), None).unwrap_err();
        assert!(matches!(err, FileError::IsDirectory { .. }));
    }
}
