//! Output directory handling: existence guard and artifact writes
//!
//! The output directory is the only record of progress. A token counts as done
//! when any entry's file stem equals the token offset in decimal, whatever its
//! extension. Payloads are written under a hidden `.part` name and renamed
//! into place, so an interrupted write never looks like a finished token.

use crate::content_type::ImageExtension;
use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Create the output directory (and parents) if it does not exist yet
pub async fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !tokio::fs::try_exists(dir).await? {
        tokio::fs::create_dir_all(dir).await?;
        tracing::debug!(dir = %dir.display(), "created output directory");
    }
    Ok(())
}

/// Path an artifact for `offset` is written to
#[must_use]
pub fn artifact_path(dir: &Path, offset: u64, extension: ImageExtension) -> PathBuf {
    dir.join(format!("{offset}.{extension}"))
}

/// Check whether an artifact for `offset` exists by listing `dir`
///
/// Performs a full directory listing per call. [`ArtifactIndex`] gives the
/// same answer from a single scan.
pub async fn artifact_exists(dir: &Path, offset: u64) -> Result<bool> {
    let wanted = offset.to_string();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if file_stem(&entry.path()).as_deref() == Some(wanted.as_str()) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

/// Set of file stems present in the output directory
///
/// Built once per run and updated after every write, so checking a token does
/// not require relisting the directory.
#[derive(Debug, Default, Clone)]
pub struct ArtifactIndex {
    stems: HashSet<String>,
}

impl ArtifactIndex {
    /// Scan `dir` and collect the stem of every entry
    pub async fn scan(dir: &Path) -> Result<Self> {
        let mut stems = HashSet::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(stem) = file_stem(&entry.path()) {
                stems.insert(stem);
            }
        }
        tracing::debug!(dir = %dir.display(), entries = stems.len(), "scanned output directory");
        Ok(Self { stems })
    }

    /// Whether an artifact for `offset` is already present
    pub fn contains(&self, offset: u64) -> bool {
        self.stems.contains(&offset.to_string())
    }

    /// Mark `offset` as persisted
    pub fn record(&mut self, offset: u64) {
        self.stems.insert(offset.to_string());
    }

    /// Number of distinct stems known
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    /// Whether no stems are known
    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}

/// Temporary name used while the payload for `offset` is being written
///
/// Its stem (`.<offset>.<ext>`) never equals a decimal offset.
fn partial_path(dir: &Path, offset: u64, extension: ImageExtension) -> PathBuf {
    dir.join(format!(".{offset}.{extension}.part"))
}

/// Write the full image payload for `offset` and return the written path
///
/// The final name only appears once the whole payload is on disk. On error
/// the temporary file is removed.
pub async fn write_artifact(
    dir: &Path,
    offset: u64,
    extension: ImageExtension,
    bytes: &[u8],
) -> Result<PathBuf> {
    let path = artifact_path(dir, offset, extension);
    let partial = partial_path(dir, offset, extension);

    let written = match tokio::fs::write(&partial, bytes).await {
        Ok(()) => tokio::fs::rename(&partial, &path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            tracing::debug!(
                path = %partial.display(),
                error = %cleanup,
                "partial file not removed"
            );
        }
        return Err(e.into());
    }
    Ok(path)
}
