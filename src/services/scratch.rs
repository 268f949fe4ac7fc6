use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const SCRATCH_PREFIX: &str = "archive-relay-";

/// Uniquely named local file that holds one object between download and
/// upload.
///
/// Owned by a single invocation. `release` deletes it explicitly; if the
/// handle is dropped first, the file is deleted on drop.
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchFile {
    /// Create an empty scratch file in `dir`, or in the system temp dir.
    pub fn create(dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file, returning the path it had.
    pub fn release(self) -> io::Result<PathBuf> {
        let path = self.path.to_path_buf();
        self.path.close()?;
        Ok(path)
    }
}
