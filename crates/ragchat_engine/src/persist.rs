use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory holding the client's durable files. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct DataDir {
    dir: PathBuf,
}

impl DataDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if missing and check that it accepts new files.
    pub fn ensure(&self) -> Result<(), PersistError> {
        if self.dir.exists() {
            let meta = fs::metadata(&self.dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
            if !meta.is_dir() {
                return Err(PersistError::DataDir(format!(
                    "{} is not a directory",
                    self.dir.display()
                )));
            }
        } else {
            fs::create_dir_all(&self.dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        }
        NamedTempFile::new_in(&self.dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        Ok(())
    }

    /// Read `{dir}/{filename}`; a missing file is `Ok(None)`.
    pub fn read(&self, filename: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.dir.join(filename)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistError::Io(err)),
        }
    }

    /// Atomically replace `{dir}/{filename}` with `content`.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        self.ensure()?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
