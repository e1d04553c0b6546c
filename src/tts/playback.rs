//! Audio playback
//!
//! Thin wrapper over the default output device. Daemon playback goes
//! through a transient artifact that is removed on every exit path, so
//! audio files never accumulate.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{Result, TtsError};

/// Play an audio file to completion on the default output device.
pub fn play_file(path: &Path) -> Result<()> {
    let stream_handle = rodio::OutputStreamBuilder::open_default_stream()
        .map_err(|e| TtsError::Playback(e.to_string()))?;
    let sink = rodio::Sink::connect_new(stream_handle.mixer());
    let source = rodio::Decoder::new(BufReader::new(File::open(path)?))
        .map_err(|e| TtsError::Playback(e.to_string()))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Write decoded audio to a transient artifact, play it, and delete it.
///
/// Deletion happens whether playback succeeds, fails, or panics: the guard
/// removes the artifact when dropped.
pub async fn play_transient(audio: Vec<u8>) -> Result<()> {
    let path = artifact_path();
    tokio::fs::write(&path, &audio).await?;
    let _guard = ArtifactGuard(path.clone());

    tokio::task::spawn_blocking(move || play_file(&path))
        .await
        .map_err(|e| TtsError::Playback(e.to_string()))?
}

struct ArtifactGuard(PathBuf);

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %self.0.display(), error = %e, "artifact cleanup failed");
            }
        }
    }
}

fn artifact_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("chatvox-{}-{}.mp3", std::process::id(), nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_guard_removes_file() {
        let path = artifact_path();
        std::fs::write(&path, b"audio").unwrap();
        assert!(path.exists());

        drop(ArtifactGuard(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_guard_tolerates_missing_file() {
        drop(ArtifactGuard(artifact_path()));
    }

    #[test]
    fn test_artifact_paths_are_unique() {
        assert_ne!(artifact_path(), artifact_path());
    }
}
