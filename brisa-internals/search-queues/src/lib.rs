//! Brisa Search Queues
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! brisa-internals/search-queues
//! A single-flight work queue and a linear-backoff retry helper for calls
//! against an exclusive, stateful external session (one browser, one form).

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time;

/// Custom error for the job queue
#[derive(Debug, Error)]
pub enum JobQueueError {
    #[error("queue is closed")]
    QueueClosed,
}

/// Custom error for retry exhaustion
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("max attempts exceeded: {0}")]
    Exhausted(#[source] anyhow::Error),
}

/// Processes one job at a time; owned by the queue's worker loop.
#[async_trait]
pub trait JobHandler<Req, Resp>: Send {
    async fn handle(&mut self, request: Req) -> Resp;
}

struct Job<Req, Resp> {
    request: Req,
    reply: oneshot::Sender<Resp>,
}

/// A single-flight work queue for an exclusive external session.
///
/// Jobs are admitted in submission order; the worker loop runs one job to
/// completion before starting the next. A started job cannot be canceled,
/// a superseding request simply queues behind it.
///
/// # Examples
///
/// ```ignore
/// let queue = JobQueue::spawn(handler);
/// let outcome = queue.submit(request).await?;
/// ```
pub struct JobQueue<Req, Resp> {
    tx: mpsc::UnboundedSender<Job<Req, Resp>>,
}

impl<Req, Resp> Clone for JobQueue<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<Req, Resp> JobQueue<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    /// Spawn the worker loop and return a handle for submitting jobs.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<H>(mut handler: H) -> Self
    where
        H: JobHandler<Req, Resp> + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job<Req, Resp>>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let response = handler.handle(job.request).await;
                // The submitter may have dropped its end; nothing to do then.
                let _ = job.reply.send(response);
            }
        });
        Self { tx }
    }

    /// Enqueue a job and wait for its result.
    pub async fn submit(&self, request: Req) -> Result<Resp, JobQueueError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Job { request, reply })
            .map_err(|_| JobQueueError::QueueClosed)?;
        rx.await.map_err(|_| JobQueueError::QueueClosed)
    }
}

/// Linear backoff with jitter for transient external-service failures.
///
/// The delay before attempt `n + 1` is `n × base_delay` plus jitter.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            jitter_factor: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Execute a function with linear-backoff retry.
    ///
    /// The function `f` should return `Result<T, E>` where `E` is an
    /// `anyhow::Error`. Every failure sleeps `attempt × base_delay` (plus
    /// jitter) before the next call, up to `max_attempts` total calls.
    pub async fn with_retry<T, F, Fut>(&self, mut f: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts.max(1) {
                        return Err(RetryError::Exhausted(e));
                    }
                    let delay = self.base_delay * attempt;
                    time::sleep(self.apply_jitter(delay)).await;
                }
            }
        }
    }

    /// Apply jitter to the delay
    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor == 0.0 {
            return delay;
        }

        let jitter_ms = (delay.as_millis() as f64 * self.jitter_factor) as u64;
        let rand_jitter = rand::thread_rng().gen_range(0..=jitter_ms);

        Duration::from_millis(delay.as_millis() as u64 + rand_jitter)
    }
}
