//! Debounced background saving
//!
//! A single worker task owns a re-armable timer. Each scheduled document
//! replaces the pending one and pushes the deadline out again, so a burst of
//! edits produces one write once the edits stop.

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant};

use super::bridge::DataBridge;
use super::document::PersistedDocument;

enum SaveCommand {
    Schedule(Box<PersistedDocument>),
    Flush(oneshot::Sender<bool>),
}

/// Handle to the autosave worker
///
/// Must be created inside a tokio runtime.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<SaveCommand>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    pub fn spawn(bridge: Arc<dyn DataBridge>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(bridge, debounce, rx));
        Self { tx, handle }
    }

    /// Queue `document` for saving once the debounce period passes quietly
    pub fn schedule(&self, document: PersistedDocument) {
        if self.tx.send(SaveCommand::Schedule(Box::new(document))).is_err() {
            warn!("Autosave worker has stopped; change not saved");
        }
    }

    /// Write any pending document now
    ///
    /// True if nothing was pending or the write succeeded. A document whose
    /// debounced write failed is still pending, so this retries it.
    pub async fn flush(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(SaveCommand::Flush(ack_tx)).is_err() {
            return false;
        }
        ack_rx.await.unwrap_or(false)
    }

    /// Flush, then stop the worker
    pub async fn shutdown(self) -> bool {
        let saved = self.flush().await;
        drop(self.tx);
        if let Err(e) = self.handle.await {
            warn!("Autosave worker ended abnormally: {}", e);
        }
        saved
    }
}

async fn run_worker(
    bridge: Arc<dyn DataBridge>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<SaveCommand>,
) {
    let mut pending: Option<PersistedDocument> = None;
    let mut armed = false;
    let timer = time::sleep(debounce);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(SaveCommand::Schedule(document)) => {
                    if pending.replace(*document).is_some() {
                        debug!("Superseding pending save");
                    }
                    armed = true;
                    timer.as_mut().reset(Instant::now() + debounce);
                }
                Some(SaveCommand::Flush(ack)) => {
                    armed = false;
                    let saved = write_pending(&bridge, &mut pending).await;
                    let _ = ack.send(saved);
                }
                None => {
                    write_pending(&bridge, &mut pending).await;
                    break;
                }
            },
            () = &mut timer, if armed => {
                armed = false;
                write_pending(&bridge, &mut pending).await;
            }
        }
    }

    debug!("Autosave worker stopped");
}

/// Write the pending document, clearing it only once the write succeeds
///
/// A failed document stays pending until the next flush or change. The
/// write runs on the blocking pool.
async fn write_pending(bridge: &Arc<dyn DataBridge>, pending: &mut Option<PersistedDocument>) -> bool {
    let Some(document) = pending.clone() else {
        return true;
    };

    let bridge = Arc::clone(bridge);
    let saved = task::spawn_blocking(move || bridge.save_data(&document))
        .await
        .unwrap_or_else(|e| {
            warn!("Save task ended abnormally: {}", e);
            false
        });

    if saved {
        *pending = None;
    } else {
        warn!("Save failed; keeping changes pending");
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::GlobalAssumptions;
    use crate::clients::ClientRegistry;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBridge {
        saved: Mutex<Vec<PersistedDocument>>,
    }

    impl RecordingBridge {
        fn saves(&self) -> Vec<PersistedDocument> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl DataBridge for RecordingBridge {
        fn load_data(&self) -> Option<PersistedDocument> {
            self.saved.lock().unwrap().last().cloned()
        }

        fn save_data(&self, document: &PersistedDocument) -> bool {
            self.saved.lock().unwrap().push(document.clone());
            true
        }

        fn data_path(&self) -> PathBuf {
            PathBuf::from("memory")
        }
    }

    /// Bridge whose first `failures` saves fail
    struct FailingBridge {
        failures: usize,
        attempts: Mutex<usize>,
    }

    impl FailingBridge {
        fn new(failures: usize) -> Self {
            Self { failures, attempts: Mutex::new(0) }
        }

        fn attempts(&self) -> usize {
            *self.attempts.lock().unwrap()
        }
    }

    impl DataBridge for FailingBridge {
        fn load_data(&self) -> Option<PersistedDocument> {
            None
        }

        fn save_data(&self, _document: &PersistedDocument) -> bool {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts > self.failures
        }

        fn data_path(&self) -> PathBuf {
            PathBuf::from("read-only")
        }
    }

    fn document_with_churn(churn: f64) -> PersistedDocument {
        let assumptions = GlobalAssumptions {
            customer_churn_rate_percent: churn,
            ..Default::default()
        };
        PersistedDocument::from_state(&ClientRegistry::new(), &assumptions)
    }

    #[tokio::test]
    async fn test_burst_coalesces_into_one_write() {
        let bridge = Arc::new(RecordingBridge::default());
        let saver = Autosaver::spawn(bridge.clone(), Duration::from_millis(40));

        for churn in [1.0, 2.0, 3.0] {
            saver.schedule(document_with_churn(churn));
            time::sleep(Duration::from_millis(5)).await;
        }
        assert!(bridge.saves().is_empty());

        time::sleep(Duration::from_millis(200)).await;
        let saves = bridge.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].global_inputs.customer_churn_rate_percent, 3.0);
    }

    #[tokio::test]
    async fn test_separate_bursts_write_separately() {
        let bridge = Arc::new(RecordingBridge::default());
        let saver = Autosaver::spawn(bridge.clone(), Duration::from_millis(20));

        saver.schedule(document_with_churn(4.0));
        time::sleep(Duration::from_millis(120)).await;
        saver.schedule(document_with_churn(6.0));
        time::sleep(Duration::from_millis(120)).await;

        let churns: Vec<f64> = bridge
            .saves()
            .iter()
            .map(|d| d.global_inputs.customer_churn_rate_percent)
            .collect();
        assert_eq!(churns, vec![4.0, 6.0]);
    }

    #[tokio::test]
    async fn test_flush_writes_immediately() {
        let bridge = Arc::new(RecordingBridge::default());
        let saver = Autosaver::spawn(bridge.clone(), Duration::from_secs(60));

        assert!(saver.flush().await);
        assert!(bridge.saves().is_empty());

        saver.schedule(document_with_churn(8.0));
        assert!(saver.flush().await);
        assert_eq!(bridge.saves().len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_saves_pending() {
        let bridge = Arc::new(RecordingBridge::default());
        let saver = Autosaver::spawn(bridge.clone(), Duration::from_secs(60));

        saver.schedule(document_with_churn(9.0));
        assert!(saver.shutdown().await);
        assert_eq!(bridge.saves().len(), 1);
        assert_eq!(bridge.load_data().unwrap().global_inputs.customer_churn_rate_percent, 9.0);
    }

    #[tokio::test]
    async fn test_failed_debounced_save_reported_on_flush() {
        let bridge = Arc::new(FailingBridge::new(usize::MAX));
        let saver = Autosaver::spawn(bridge.clone(), Duration::from_millis(10));

        saver.schedule(document_with_churn(2.0));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(bridge.attempts(), 1);

        // The failed document is retried, and the failure reported
        assert!(!saver.flush().await);
        assert_eq!(bridge.attempts(), 2);
        assert!(!saver.shutdown().await);
    }

    #[tokio::test]
    async fn test_flush_retries_until_saved() {
        let bridge = Arc::new(FailingBridge::new(1));
        let saver = Autosaver::spawn(bridge.clone(), Duration::from_millis(10));

        saver.schedule(document_with_churn(3.0));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(bridge.attempts(), 1);

        assert!(saver.flush().await);
        assert_eq!(bridge.attempts(), 2);
        // Nothing left pending after the successful retry
        assert!(saver.flush().await);
        assert_eq!(bridge.attempts(), 2);
    }
}
