use crate::error::{GadgetError, Result};
use crate::instrument::EditBatch;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One snapshot of a file on disk.
///
/// Edits computed against the snapshot are committed all at once: the new
/// text is written to a temporary file beside the original and renamed over
/// it, and the commit is refused if the file changed since it was read.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path)?;
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text the batch would produce, without touching the file.
    pub fn preview(&self, batch: &EditBatch) -> Result<String> {
        batch.apply(&self.text)
    }

    /// Apply the batch to the file and move the snapshot forward.
    pub fn commit(&mut self, batch: &EditBatch) -> Result<()> {
        let updated = batch.apply(&self.text)?;

        let on_disk = fs::read_to_string(&self.path)?;
        if on_disk != self.text {
            return Err(GadgetError::Stale(self.path.display().to_string()));
        }

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(updated.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| GadgetError::Io(e.error))?;

        info!(
            path = %self.path.display(),
            edits = batch.len(),
            "applied edit batch"
        );
        self.text = updated;
        Ok(())
    }
}
