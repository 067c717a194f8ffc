//! Persistence sinks for rendered exports.
//!
//! Exactly one sink is used per export: either the host negotiates a save
//! path with the user (dialog sink), or the bytes go straight into a fixed
//! directory (download sink). Cancelling the dialog is a non-error outcome.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;

/// How an export ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The export was written to this path.
    Saved(PathBuf),
    /// The user cancelled the save dialog; nothing was written.
    Cancelled,
}

/// Host-provided save-path negotiation.
///
/// Implementations show whatever dialog the host UI has and resolve to the
/// chosen path, or `None` when the user backs out (an empty selection counts
/// as backing out). A dialog that *fails*, as opposed to being dismissed,
/// maps to [`crate::ExportError::Dialog`].
#[async_trait]
pub trait SavePrompt: Send + Sync {
    /// Asks the user where to save a file, suggesting `default_name`.
    async fn pick_save_path(&self, default_name: &str) -> Result<Option<PathBuf>>;
}

/// Persists `data` through a save dialog.
///
/// # Errors
///
/// [`crate::ExportError::Dialog`] when the prompt fails, [`crate::ExportError::Write`]
/// when the chosen path cannot be written.
pub async fn save_with_prompt<P>(
    prompt: &P,
    data: &[u8],
    default_name: &str,
) -> Result<ExportOutcome>
where
    P: SavePrompt + ?Sized,
{
    let Some(path) = prompt.pick_save_path(default_name).await? else {
        debug!(default_name, "save dialog cancelled");
        return Ok(ExportOutcome::Cancelled);
    };

    write_bytes(&path, data).await?;
    info!(path = %path.display(), bytes = data.len(), "export saved");
    Ok(ExportOutcome::Saved(path))
}

/// Sink that writes exports straight into a fixed directory, no dialog.
#[derive(Debug, Clone)]
pub struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    /// Creates a sink targeting the user's download directory, falling back
    /// to the home directory, then the current directory.
    #[must_use]
    pub fn new() -> Self {
        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    /// Creates a sink targeting an explicit directory.
    #[must_use]
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `data` as `file_name` into the sink's directory.
    ///
    /// # Errors
    ///
    /// [`crate::ExportError::Write`] when the directory cannot be created or the
    /// file cannot be written.
    pub async fn save(&self, data: &[u8], file_name: &str) -> Result<ExportOutcome> {
        let path = self.dir.join(file_name);
        write_bytes(&path, data).await?;
        info!(path = %path.display(), bytes = data.len(), "export downloaded");
        Ok(ExportOutcome::Saved(path))
    }
}

impl Default for DownloadSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the parent directory if needed, then writes the file.
async fn write_bytes(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    /// Prompt double resolving to a fixed answer.
    struct ScriptedPrompt(Option<PathBuf>);

    #[async_trait]
    impl SavePrompt for ScriptedPrompt {
        async fn pick_save_path(&self, _default_name: &str) -> Result<Option<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    /// Prompt double whose dialog machinery breaks.
    struct BrokenPrompt;

    #[async_trait]
    impl SavePrompt for BrokenPrompt {
        async fn pick_save_path(&self, _default_name: &str) -> Result<Option<PathBuf>> {
            Err(ExportError::Dialog("dialog backend unavailable".into()))
        }
    }

    #[tokio::test]
    async fn cancelled_dialog_is_not_an_error() {
        let outcome = save_with_prompt(&ScriptedPrompt(None), b"data", "emails.csv")
            .await
            .unwrap();
        assert_eq!(outcome, ExportOutcome::Cancelled);
    }

    #[tokio::test]
    async fn dialog_failure_is_an_error() {
        let err = save_with_prompt(&BrokenPrompt, b"data", "emails.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Dialog(_)));
    }

    #[tokio::test]
    async fn chosen_path_is_written_with_parents_created() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested/dir/out.csv");
        let prompt = ScriptedPrompt(Some(target.clone()));

        let outcome = save_with_prompt(&prompt, b"a,b\r\n", "emails.csv")
            .await
            .unwrap();

        assert_eq!(outcome, ExportOutcome::Saved(target.clone()));
        assert_eq!(std::fs::read(target).unwrap(), b"a,b\r\n");
    }

    #[tokio::test]
    async fn download_sink_writes_into_its_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DownloadSink::with_dir(tmp.path());

        let outcome = sink.save(b"x", "emails.xls").await.unwrap();

        let expected = tmp.path().join("emails.xls");
        assert_eq!(outcome, ExportOutcome::Saved(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"x");
    }

    #[tokio::test]
    async fn unwritable_target_surfaces_write_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the sink expects a directory.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let sink = DownloadSink::with_dir(blocker.join("sub"));

        let err = sink.save(b"x", "emails.csv").await.unwrap_err();
        assert!(matches!(err, ExportError::Write(_)));
    }
}
