use crate::{Error, ErrorKind};
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STAGING_PREFIX: &str = "hlse";
const STAGING_NAME: &str = "hlse_tmp.db";

/// An on-disk copy of the database image owned by a single edit
///
/// The file lives in a fresh temporary directory so that any journal files
/// the database engine creates beside it are removed together with it. The
/// directory is deleted when this value is dropped, whether or not the edit
/// succeeded.
#[derive(Debug)]
pub struct StagingFile {
    dir: TempDir,
    path: PathBuf,
}

impl StagingFile {
    /// Creates a new staging file populated with `blob`
    pub fn create(blob: &[u8]) -> Result<Self, Error> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()
            .map_err(staging_io)?;
        let path = dir.path().join(STAGING_NAME);
        std::fs::write(&path, blob).map_err(staging_io)?;
        debug!("staged {} bytes at {}", blob.len(), path.display());
        Ok(StagingFile { dir, path })
    }

    /// Location of the staged database
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current contents of the staged database
    ///
    /// Any connection to the file must be closed first so that every page
    /// has been written back.
    pub fn read_back(&self) -> Result<Vec<u8>, Error> {
        std::fs::read(&self.path).map_err(staging_io)
    }

    /// Deletes the staging directory now and reports failures, instead of
    /// ignoring them on drop
    pub fn close(self) -> Result<(), Error> {
        self.dir.close().map_err(staging_io)
    }
}

fn staging_io(err: std::io::Error) -> Error {
    Error::new(ErrorKind::StagingIo(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_roundtrip() {
        let staging = StagingFile::create(b"database bytes").unwrap();
        assert!(staging.path().exists());
        assert_eq!(staging.read_back().unwrap(), b"database bytes");

        std::fs::write(staging.path(), b"edited").unwrap();
        assert_eq!(staging.read_back().unwrap(), b"edited");
    }

    #[test]
    fn test_staging_removed_on_drop() {
        let staging = StagingFile::create(b"").unwrap();
        let path = staging.path().to_path_buf();
        let dir = path.parent().unwrap().to_path_buf();
        std::fs::write(dir.join("hlse_tmp.db-journal"), b"journal").unwrap();

        drop(staging);
        assert!(!path.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_staging_removed_on_close() {
        let staging = StagingFile::create(b"abc").unwrap();
        let path = staging.path().to_path_buf();
        staging.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_staging_unique() {
        let a = StagingFile::create(b"a").unwrap();
        let b = StagingFile::create(b"b").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(a.read_back().unwrap(), b"a");
        assert_eq!(b.read_back().unwrap(), b"b");
    }
}
