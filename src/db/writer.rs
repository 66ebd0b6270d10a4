use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::{KeyValueStore, StoreKey};
use crate::error::{AppError, AppResult};

/// Message for asynchronous store writes
struct WriteMessage {
    key: StoreKey,
    value: String,
}

/// Store wrapper that defers writes to a background task
///
/// `set` only enqueues; the wrapped store sees writes in submission order.
/// Reads go straight to the wrapped store and may not observe writes that are
/// still queued, which is fine for records that are read once at startup.
#[derive(Clone)]
pub struct BackgroundStore {
    inner: Arc<dyn KeyValueStore>,
    write_tx: mpsc::UnboundedSender<WriteMessage>,
}

/// Handle for gracefully shutting down the store writer
pub struct StoreWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl StoreWriterHandle {
    /// Signals the writer task and waits until every queued write is flushed
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Store writer shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Store writer task panicked");
        }
    }
}

impl BackgroundStore {
    /// Wraps `inner` and spawns the writer task on the current runtime
    pub fn new(inner: Arc<dyn KeyValueStore>) -> (Self, StoreWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let target = inner.clone();
        let task = tokio::spawn(async move {
            Self::writer_task(target, write_rx, shutdown_rx).await;
        });

        let store = Self { inner, write_tx };
        let handle = StoreWriterHandle { shutdown_tx, task };

        (store, handle)
    }

    /// Drains write messages until shutdown, then flushes what is left
    async fn writer_task(
        target: Arc<dyn KeyValueStore>,
        mut write_rx: mpsc::UnboundedReceiver<WriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Store writer task started");

        loop {
            tokio::select! {
                msg = write_rx.recv() => {
                    match msg {
                        Some(msg) => Self::write(&target, msg).await,
                        None => break,
                    }
                }
                _ = shutdown_rx.recv() => {
                    let mut flushed = 0usize;
                    while let Ok(msg) = write_rx.try_recv() {
                        Self::write(&target, msg).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Store writer flushed remaining writes");
                    break;
                }
            }
        }

        tracing::info!("Store writer task stopped");
    }

    /// Performs a single blocking write off the async worker
    async fn write(target: &Arc<dyn KeyValueStore>, msg: WriteMessage) {
        let target = target.clone();
        let key = msg.key;
        let result = tokio::task::spawn_blocking(move || target.set(&msg.key, msg.value)).await;

        match result {
            Ok(Ok(())) => tracing::debug!(key = %key, "Record written"),
            Ok(Err(e)) => tracing::error!(key = %key, error = %e, "Failed to write record"),
            Err(e) => tracing::error!(key = %key, error = %e, "Write task join error"),
        }
    }
}

impl KeyValueStore for BackgroundStore {
    fn get(&self, key: &StoreKey) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &StoreKey, value: String) -> AppResult<()> {
        self.write_tx
            .send(WriteMessage { key: *key, value })
            .map_err(|e| AppError::Storage(format!("store writer is gone: {}", e)))
    }
}
