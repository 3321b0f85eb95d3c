// Storage - run events as JSON Lines
//
// One file per run: sitefx-YYYYMMDD-HHMMSS-XXXX.jsonl, one TrackedEvent per line.
// Example: jq 'select(.type == "text_changed") | .text' logs/sitefx-20260301-101500-3fa1.jsonl

use crate::events::TrackedEvent;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Writes tracked events to the run's JSONL file
pub struct Storage {
    log_path: PathBuf,
    event_rx: mpsc::Receiver<TrackedEvent>,
}

impl Storage {
    pub fn new(
        log_dir: &Path,
        session_id: &str,
        event_rx: mpsc::Receiver<TrackedEvent>,
    ) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        Ok(Self {
            log_path: log_dir.join(format!("sitefx-{}.jsonl", session_id)),
            event_rx,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Write events as they arrive until every sender is gone.
    /// Returns the number of events written.
    pub async fn run(mut self) -> Result<usize> {
        tracing::info!("Storage started, run log: {}", self.log_path.display());

        let mut written = 0;
        while let Some(event) = self.event_rx.recv().await {
            match self.write_event(&event) {
                Ok(()) => written += 1,
                // One bad write should not lose the rest of the run
                Err(e) => tracing::error!("Failed to write event: {:?}", e),
            }
        }

        tracing::info!("Storage shutting down after {} event(s)", written);
        Ok(written)
    }

    fn write_event(&self, event: &TrackedEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .context("Failed to open log file")?;

        let json = serde_json::to_string(event).context("Failed to serialize event")?;
        writeln!(file, "{}", json).context("Failed to write to log file")?;

        // Visible to `tail -f` even if the process dies mid-run
        file.flush().context("Failed to flush log file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::TriggerKind;
    use crate::events::PageEvent;

    #[tokio::test]
    async fn test_events_written_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel(8);
        let storage = Storage::new(dir.path(), "20260301-101500-3fa1", rx).unwrap();
        let path = storage.log_path().to_path_buf();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "sitefx-20260301-101500-3fa1.jsonl"
        );

        let handle = tokio::spawn(storage.run());
        tx.send(TrackedEvent::new(
            PageEvent::Scrolled {
                at_ms: 500,
                scroll_y: 900.0,
            },
            "20260301-101500-3fa1",
        ))
        .await
        .unwrap();
        tx.send(TrackedEvent::new(
            PageEvent::AnimationStarted {
                at_ms: 500,
                kind: TriggerKind::SkillCircle,
                element: "section.skills-section@4".to_string(),
            },
            "20260301-101500-3fa1",
        ))
        .await
        .unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap().unwrap(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "scrolled");
        assert_eq!(lines[0]["session_id"], "20260301-101500-3fa1");
        assert_eq!(lines[1]["type"], "animation_started");
        assert_eq!(lines[1]["kind"], "skill_circle");
        assert!(lines[1]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_creates_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("today");
        let (_tx, rx) = mpsc::channel(1);
        Storage::new(&nested, "x", rx).unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_unwritable_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let (_tx, rx) = mpsc::channel(1);
        assert!(Storage::new(&blocker.join("logs"), "x", rx).is_err());
    }
}
