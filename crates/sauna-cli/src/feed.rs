//! Presence event feed — reads JSON-lines [`PresenceEvent`]s on a background
//! task and hands them to the UI loop over a channel.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sauna_core::PresenceEvent;
use tokio::{
  fs::File,
  io::{AsyncBufRead, AsyncBufReadExt, BufReader},
  sync::mpsc,
};

const CHANNEL_CAPACITY: usize = 256;

/// Spawn a task that reads `path` to the end, forwarding each event.
///
/// The receiver sees the channel close once the file is exhausted or the
/// reader fails; failures are logged.
pub fn spawn(path: PathBuf) -> mpsc::Receiver<PresenceEvent> {
  let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

  tokio::spawn(async move {
    match read_file(&path, &tx).await {
      Ok(count) => tracing::info!(count, "event feed finished"),
      Err(e) => tracing::error!(error = %format!("{e:#}"), "event feed failed"),
    }
  });

  rx
}

async fn read_file(path: &Path, tx: &mpsc::Sender<PresenceEvent>) -> Result<usize> {
  let file = File::open(path)
    .await
    .with_context(|| format!("opening event feed {}", path.display()))?;
  read_events(BufReader::new(file), tx).await
}

/// Read events line by line until EOF or until the receiver goes away.
/// Blank and malformed lines are skipped. Returns the number forwarded.
pub async fn read_events<R>(
  reader: R,
  tx: &mpsc::Sender<PresenceEvent>,
) -> Result<usize>
where
  R: AsyncBufRead + Unpin,
{
  let mut lines = reader.lines();
  let mut count = 0;
  let mut line_no = 0usize;

  while let Some(line) = lines.next_line().await.context("reading event feed")? {
    line_no += 1;
    if line.trim().is_empty() {
      continue;
    }

    match PresenceEvent::from_json(&line) {
      Ok(event) => {
        if tx.send(event).await.is_err() {
          break;
        }
        count += 1;
      }
      Err(e) => tracing::warn!(line = line_no, error = %e, "skipping event"),
    }
  }

  Ok(count)
}
