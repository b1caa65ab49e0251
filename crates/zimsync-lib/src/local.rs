use crate::error::EntryError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// State of an archive's local copy, read fresh from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub size: Option<u64>,
}

impl LocalFile {
    pub async fn probe(path: &Path) -> Result<Self, EntryError> {
        let size = match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => Some(metadata.len()),
            Ok(_) => {
                return Err(EntryError::NotAFile {
                    path: path.to_path_buf(),
                });
            }
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(source) => {
                return Err(EntryError::LocalProbe {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            size,
        })
    }

    pub fn exists(&self) -> bool {
        self.size.is_some()
    }
}
