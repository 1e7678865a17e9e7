//! Save scheduling
//!
//! A single tokio worker owns every write for a session, which gives:
//! - immediate saves reach the store in issue order, each awaited before the
//!   next command is read
//! - at most one debounced save is pending; any later save replaces it
//! - `flush` acknowledges only after everything issued before it is written

use crate::config::SyncConfig;
use crate::error::StoreError;
use crate::store::{DocumentStore, SaveMode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Rendered content waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Document id
    pub id: String,
    /// Full wire text
    pub content: String,
    /// Scheduling mode
    pub mode: SaveMode,
    /// Engine revision the content was rendered from
    pub revision: u64,
}

/// Completion report from the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEvent {
    /// Write accepted by the store
    Saved { revision: u64, mode: SaveMode },
    /// Write rejected by the store
    SaveFailed {
        revision: u64,
        mode: SaveMode,
        error: StoreError,
    },
}

impl SaveEvent {
    /// Revision the event refers to
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        match self {
            Self::Saved { revision, .. } | Self::SaveFailed { revision, .. } => *revision,
        }
    }
}

#[derive(Debug)]
enum Command {
    Save(SaveRequest),
    CancelPending,
    Flush(oneshot::Sender<()>),
}

/// Handle to the save worker
#[derive(Debug)]
pub struct SaveScheduler {
    tx: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

impl SaveScheduler {
    /// Spawn the worker on the current tokio runtime
    ///
    /// Returns the handle and the receiving end of completion events.
    #[must_use]
    pub fn spawn(
        store: Arc<dyn DocumentStore>,
        config: &SyncConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SaveEvent>) {
        let (tx, rx) = mpsc::channel(config.save_queue_capacity.max(1));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let worker = Worker {
            store,
            window: config.debounce_window(),
            rx,
            events: events_tx,
            pending: None,
        };
        let handle = tokio::spawn(worker.run());
        (Self { tx, handle }, events_rx)
    }

    /// Queue a save
    ///
    /// # Errors
    /// Returns error if the queue is full or the worker has stopped
    pub fn submit(&self, request: SaveRequest) -> Result<(), StoreError> {
        self.send_now(Command::Save(request))
    }

    /// Drop a pending debounced save, if any
    ///
    /// # Errors
    /// Returns error if the queue is full or the worker has stopped
    pub fn cancel_pending(&self) -> Result<(), StoreError> {
        self.send_now(Command::CancelPending)
    }

    /// Write any pending debounced save and wait for all queued writes
    ///
    /// # Errors
    /// Returns error if the worker has stopped
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(ack_tx))
            .await
            .map_err(|_| StoreError::WorkerStopped)?;
        ack_rx.await.map_err(|_| StoreError::WorkerStopped)
    }

    /// Stop the worker after it writes anything still pending
    ///
    /// # Errors
    /// Returns error if the worker panicked
    pub async fn shutdown(self) -> Result<(), StoreError> {
        drop(self.tx);
        self.handle.await.map_err(|_| StoreError::WorkerStopped)
    }

    fn send_now(&self, command: Command) -> Result<(), StoreError> {
        self.tx.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => StoreError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => StoreError::WorkerStopped,
        })
    }
}

struct Worker {
    store: Arc<dyn DocumentStore>,
    window: Duration,
    rx: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<SaveEvent>,
    pending: Option<(SaveRequest, Instant)>,
}

impl Worker {
    async fn run(mut self) {
        loop {
            let command = match self.pending.as_ref().map(|(_, at)| *at) {
                Some(deadline) => tokio::select! {
                    command = self.rx.recv() => command,
                    () = sleep_until(deadline) => {
                        self.write_pending().await;
                        continue;
                    }
                },
                None => self.rx.recv().await,
            };

            let Some(command) = command else {
                self.write_pending().await;
                debug!("save worker stopped");
                return;
            };

            match command {
                Command::Save(request) if request.mode.is_debounced() => {
                    if let Some((old, _)) = &self.pending {
                        debug!(superseded = old.revision, by = request.revision, "debounced save replaced");
                    }
                    self.pending = Some((request, Instant::now() + self.window));
                }
                Command::Save(request) => {
                    if let Some((old, _)) = self.pending.take() {
                        debug!(superseded = old.revision, by = request.revision, "debounced save replaced");
                    }
                    self.write(request).await;
                }
                Command::CancelPending => {
                    if let Some((old, _)) = self.pending.take() {
                        debug!(revision = old.revision, "debounced save cancelled");
                    }
                }
                Command::Flush(ack) => {
                    self.write_pending().await;
                    let _ = ack.send(());
                }
            }
        }
    }

    async fn write_pending(&mut self) {
        if let Some((request, _)) = self.pending.take() {
            self.write(request).await;
        }
    }

    async fn write(&self, request: SaveRequest) {
        let SaveRequest {
            id,
            content,
            mode,
            revision,
        } = request;
        let event = match self.store.save(&id, &content, mode).await {
            Ok(()) => {
                debug!(%id, revision, %mode, "saved");
                SaveEvent::Saved { revision, mode }
            }
            Err(error) => {
                warn!(%id, revision, %mode, %error, "save failed");
                SaveEvent::SaveFailed {
                    revision,
                    mode,
                    error,
                }
            }
        };
        // receiver gone means the session is closing
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use pretty_assertions::assert_eq;

    fn request(content: &str, mode: SaveMode, revision: u64) -> SaveRequest {
        SaveRequest {
            id: "d1".into(),
            content: content.into(),
            mode,
            revision,
        }
    }

    fn spawn(store: &Arc<InMemoryStore>) -> (SaveScheduler, mpsc::UnboundedReceiver<SaveEvent>) {
        let config = SyncConfig::default().with_debounce_window(Duration::from_millis(100));
        SaveScheduler::spawn(store.clone(), &config)
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_saves_keep_order() {
        let store = Arc::new(InMemoryStore::new());
        let (scheduler, mut events) = spawn(&store);

        for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
            scheduler
                .submit(request(text, SaveMode::Immediate, i as u64 + 1))
                .unwrap();
        }
        scheduler.flush().await.unwrap();

        let written: Vec<_> = store.writes().into_iter().map(|w| w.content).collect();
        assert_eq!(written, ["a", "b", "c"]);
        for expected in 1..=3 {
            assert_eq!(events.recv().await.unwrap().revision(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_saves_coalesce() {
        let store = Arc::new(InMemoryStore::new());
        let (scheduler, mut events) = spawn(&store);

        scheduler.submit(request("a", SaveMode::Debounced, 1)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.submit(request("ab", SaveMode::Debounced, 2)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.latest("d1").as_deref(), Some("ab"));
        assert_eq!(store.write_count(), 1);
        assert_eq!(
            events.recv().await.unwrap(),
            SaveEvent::Saved {
                revision: 2,
                mode: SaveMode::Debounced
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_supersedes_pending_debounce() {
        let store = Arc::new(InMemoryStore::new());
        let (scheduler, _events) = spawn(&store);

        scheduler.submit(request("typed", SaveMode::Debounced, 1)).unwrap();
        scheduler.submit(request("typed+moved", SaveMode::Immediate, 2)).unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].content, "typed+moved");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_debounce() {
        let store = Arc::new(InMemoryStore::new());
        let (scheduler, _events) = spawn(&store);

        scheduler.submit(request("stale", SaveMode::Debounced, 1)).unwrap();
        scheduler.cancel_pending().unwrap();
        scheduler.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_forces_pending_debounce() {
        let store = Arc::new(InMemoryStore::new());
        let (scheduler, _events) = spawn(&store);

        scheduler.submit(request("draft", SaveMode::Debounced, 1)).unwrap();
        scheduler.flush().await.unwrap();
        assert_eq!(store.latest("d1").as_deref(), Some("draft"));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_next(1);
        let (scheduler, mut events) = spawn(&store);

        scheduler.submit(request("x", SaveMode::Immediate, 1)).unwrap();
        scheduler.flush().await.unwrap();

        assert!(matches!(
            events.recv().await.unwrap(),
            SaveEvent::SaveFailed { revision: 1, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_writes_pending() {
        let store = Arc::new(InMemoryStore::new());
        let (scheduler, _events) = spawn(&store);

        scheduler.submit(request("last", SaveMode::Debounced, 1)).unwrap();
        scheduler.shutdown().await.unwrap();
        assert_eq!(store.latest("d1").as_deref(), Some("last"));
    }
}
