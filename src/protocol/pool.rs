use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::dataset::DatasetCatalog;
use crate::protocol::{handle, Request, Response};

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker pool is shut down")]
    Closed,

    #[error("Request {0} was dropped without a response")]
    Dropped(String),

    #[error("Request {0} timed out")]
    Timeout(String),
}

/// A response tagged with the id of the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub request_id: String,
    pub response: Response,
}

struct Job {
    request_id: String,
    request: Request,
    reply: Sender<Envelope>,
}

/// Fixed set of threads answering requests against a shared catalog.
///
/// Requests complete in any order; callers correlate by request id. A
/// caller that stops waiting simply drops its [`Pending`]; the search
/// still runs to completion and its reply is discarded.
pub struct WorkerPool {
    queue: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    next_id: AtomicU64,
}

impl WorkerPool {
    pub fn new(catalog: Arc<DatasetCatalog>, config: &EngineConfig) -> Result<Self, PoolError> {
        let (queue, jobs) = bounded::<Job>(config.queue_capacity.max(1));
        let worker_count = config.workers.max(1);

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let jobs = jobs.clone();
            let catalog = Arc::clone(&catalog);
            let config = config.clone();
            let handle = thread::Builder::new()
                .name(format!("param-worker-{worker_id}"))
                .spawn(move || run_worker(worker_id, &jobs, &catalog, &config))?;
            workers.push(handle);
        }

        info!(
            workers = worker_count,
            queue_capacity = config.queue_capacity,
            datasets = catalog.len(),
            "Worker pool started"
        );

        Ok(Self {
            queue: Some(queue),
            workers,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// A fresh id for callers that do not bring their own.
    pub fn next_request_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Queue a request. Blocks while the queue is full.
    pub fn submit(
        &self,
        request_id: impl Into<String>,
        request: Request,
    ) -> Result<Pending, PoolError> {
        let request_id = request_id.into();
        let (reply, receiver) = bounded(1);
        self.submit_to(request_id.clone(), request, reply)?;
        Ok(Pending {
            request_id,
            receiver,
        })
    }

    /// Queue a request whose reply goes to a shared channel.
    pub fn submit_to(
        &self,
        request_id: String,
        request: Request,
        reply: Sender<Envelope>,
    ) -> Result<(), PoolError> {
        let queue = self.queue.as_ref().ok_or(PoolError::Closed)?;
        trace!(request_id = %request_id, operation = %request.operation(), "queueing request");
        queue
            .send(Job {
                request_id,
                request,
                reply,
            })
            .map_err(|_| PoolError::Closed)
    }

    /// Submit under a generated id and wait for the answer.
    pub fn call(&self, request: Request) -> Result<Response, PoolError> {
        let pending = self.submit(self.next_request_id(), request)?;
        Ok(pending.wait()?.response)
    }

    /// Stop accepting work, finish what is queued, and join the workers.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.queue.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
        debug!("Worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
    }
}

/// Handle to one in-flight request.
#[derive(Debug)]
pub struct Pending {
    request_id: String,
    receiver: Receiver<Envelope>,
}

impl Pending {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn wait(self) -> Result<Envelope, PoolError> {
        self.receiver
            .recv()
            .map_err(|_| PoolError::Dropped(self.request_id))
    }

    /// Wait up to `timeout`. The request stays pending after a timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Envelope, PoolError> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => PoolError::Timeout(self.request_id.clone()),
            RecvTimeoutError::Disconnected => PoolError::Dropped(self.request_id.clone()),
        })
    }
}

fn run_worker(
    worker_id: usize,
    jobs: &Receiver<Job>,
    catalog: &DatasetCatalog,
    config: &EngineConfig,
) {
    for job in jobs.iter() {
        let started = Instant::now();
        let operation = job.request.operation();
        let response = handle(catalog, job.request, config);

        debug!(
            worker_id,
            request_id = %job.request_id,
            %operation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request complete"
        );

        let envelope = Envelope {
            request_id: job.request_id,
            response,
        };
        if job.reply.send(envelope).is_err() {
            trace!(worker_id, "caller went away, reply discarded");
        }
    }
}
