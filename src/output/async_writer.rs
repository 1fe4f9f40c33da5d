use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use crate::output::writer_jsonl::ScanRecord;

/// Spawn a background task that writes received ScanRecord items as JSONL to `path`.
/// The task finishes once every sender is dropped.
pub fn spawn_jsonl_writer(path: PathBuf, mut rx: mpsc::Receiver<ScanRecord>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(mut f) => {
                while let Some(record) = rx.recv().await {
                    match serde_json::to_vec(&record) {
                        Ok(mut line) => {
                            line.push(b'\n');
                            if let Err(e) = f.write_all(&line).await {
                                tracing::error!(error=%e, "failed to write jsonl record");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error=%e, scan_target=%record.target, "failed to serialize ScanRecord");
                        }
                    }
                }
                // flush on close
                if let Err(e) = f.flush().await {
                    tracing::error!(error=%e, "failed to flush jsonl writer");
                }
            }
            Err(e) => {
                tracing::error!(error=%e, path=%path.display(), "failed to open jsonl output file");
            }
        }
    })
}
