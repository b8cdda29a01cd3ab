//! Background worker pool that applies soft deletions off the request path.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::deletion_job::DeletionJob;
use crate::domain::repositories::RecordRepository;

/// Errors returned by [`DeletionPool::submit`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("deletion pool is shut down")]
    Closed,
}

/// A fixed set of long-lived workers draining one bounded job queue.
///
/// Every worker pulls [`DeletionJob`]s from the shared queue and calls
/// [`RecordRepository::delete_batch`]. A failed job is logged and dropped; it
/// never stops the worker. Jobs handled by one worker keep their submission
/// order, but there is no ordering across workers.
///
/// # Lifecycle
///
/// 1. [`DeletionPool::start`] spawns the workers on the current tokio runtime
/// 2. [`DeletionPool::submit`] enqueues jobs, waiting while the queue is full
/// 3. [`DeletionPool::shutdown`] closes the queue, waits for queued and
///    in-flight jobs to finish, and joins every worker
pub struct DeletionPool {
    sender: RwLock<Option<mpsc::Sender<DeletionJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
    capacity: usize,
}

impl DeletionPool {
    /// Spawns `worker_count` workers sharing a queue of `capacity` jobs.
    ///
    /// Both values are clamped to at least one.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<R>(repository: Arc<R>, worker_count: usize, capacity: usize) -> Self
    where
        R: RecordRepository + ?Sized + 'static,
    {
        let worker_count = worker_count.max(1);
        let capacity = capacity.max(1);

        let (tx, rx) = mpsc::channel(capacity);
        let rx = Arc::new(Mutex::new(rx));

        let workers = (0..worker_count)
            .map(|id| tokio::spawn(run_deletion_worker(id, rx.clone(), repository.clone())))
            .collect();

        info!(workers = worker_count, capacity, "Deletion pool started");

        Self {
            sender: RwLock::new(Some(tx)),
            workers: Mutex::new(workers),
            worker_count,
            capacity,
        }
    }

    /// Enqueues a job, waiting for room if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] once [`Self::shutdown`] has been called.
    pub async fn submit(&self, job: DeletionJob) -> Result<(), PoolError> {
        let sender = self.sender.read().await.clone().ok_or(PoolError::Closed)?;

        sender.send(job).await.map_err(|_| PoolError::Closed)
    }

    /// Number of jobs waiting in the queue, or `None` after shutdown.
    pub async fn queued(&self) -> Option<usize> {
        self.sender
            .read()
            .await
            .as_ref()
            .map(|tx| tx.max_capacity() - tx.capacity())
    }

    pub async fn is_closed(&self) -> bool {
        self.sender.read().await.is_none()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stops accepting jobs and waits until every queued job has been processed.
    ///
    /// Calling it again is a no-op.
    pub async fn shutdown(&self) {
        // Workers see the end of the queue once the last sender is gone.
        drop(self.sender.write().await.take());

        let workers = std::mem::take(&mut *self.workers.lock().await);
        if workers.is_empty() {
            return;
        }

        for handle in workers {
            if let Err(e) = handle.await {
                error!(error = %e, "Deletion worker terminated abnormally");
            }
        }

        info!("Deletion pool drained");
    }
}

async fn run_deletion_worker<R>(
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<DeletionJob>>>,
    repository: Arc<R>,
) where
    R: RecordRepository + ?Sized,
{
    loop {
        let job = jobs.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        debug!(worker = id, owner_id = %job.owner_id, keys = ?job.keys, "Processing deletion job");

        let DeletionJob { owner_id, keys } = job;
        let count = keys.len();

        match repository.delete_batch(&owner_id, keys).await {
            Ok(()) => debug!(worker = id, count, "Deletion job applied"),
            Err(e) => warn!(worker = id, %owner_id, count, error = %e, "Deletion job failed, dropping it"),
        }
    }

    debug!(worker = id, "Deletion worker stopped");
}
