//! Fixed-size worker pool for file-grained tasks.
//!
//! The FIFO task queue is a bounded `crossbeam_channel`: [`WorkerPool::submit_job`]
//! blocks on `send` while the queue is at capacity, and each worker drains
//! jobs from the shared receiver until the producer side closes. The worker
//! threads themselves are hosted by a `rayon::ThreadPool` sized to the worker
//! count, one long-lived drain loop per thread.
//!
//! Quiescence is tracked with tokens rather than a shared counter: every
//! finished job posts one token on a completion channel, and
//! [`WorkerPool::wait_until_idle`] receives tokens until it has seen one per
//! submitted job. A panic inside a job is caught at the worker boundary,
//! reported to stderr, and still posts its token, so sibling tasks keep
//! running and the idle wait cannot hang.
//!
//! Dropping the pool waits for outstanding jobs, closes the queue (ending
//! each drain loop), and joins the worker threads.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

/// Job type: a closure that has already captured its arguments.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size worker pool handle.
pub struct WorkerPool {
    // Field order matters for Drop: closing `job_tx` first lets the drain
    // loops finish, so the rayon pool below can join its threads.
    /// Producer side of the job queue.
    job_tx: Sender<Job>,
    /// One token arrives here per finished job, panicked or not.
    done_rx: Receiver<()>,
    /// Jobs handed to the queue over the pool's lifetime.
    submitted: AtomicUsize,
    /// Completion tokens already consumed by [`WorkerPool::wait_until_idle`].
    collected: AtomicUsize,
    /// Hosts the drain loops; joins them when dropped.
    workers: rayon::ThreadPool,
}

/// Best-effort text of a panic payload for the worker-boundary report.
fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

impl WorkerPool {
    /// Creates a pool of `nb_threads` workers whose queue holds up to
    /// `queue_size` jobs beyond the ones executing. Returns `None` when
    /// either value is zero or the worker threads cannot be spawned.
    pub fn new(nb_threads: usize, queue_size: usize) -> Option<Self> {
        if nb_threads == 0 || queue_size == 0 {
            return None;
        }
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(nb_threads)
            .build()
            .ok()?;

        let (job_tx, job_rx) = bounded::<Job>(queue_size);
        let (done_tx, done_rx) = unbounded::<()>();

        // One drain loop per worker thread. Each loop runs until the
        // producer side of the queue is dropped and the backlog is empty.
        for _ in 0..nb_threads {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            workers.spawn(move || {
                for job in job_rx.iter() {
                    if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                        eprintln!(
                            "codecpipe: worker task panicked: {}",
                            panic_reason(payload.as_ref())
                        );
                    }
                    // Token must be posted on every exit of the job,
                    // otherwise wait_until_idle would hang on a panic.
                    let _ = done_tx.send(());
                }
            });
        }

        Some(WorkerPool {
            job_tx,
            done_rx,
            submitted: AtomicUsize::new(0),
            collected: AtomicUsize::new(0),
            workers,
        })
    }

    /// Number of worker threads in the pool.
    pub fn thread_count(&self) -> usize {
        self.workers.current_num_threads()
    }

    /// Submits one job; blocks while the queue is at capacity.
    ///
    /// The submission is counted before it enters the queue, so a concurrent
    /// [`WorkerPool::wait_until_idle`] can never miss it.
    pub fn submit_job(&self, job: Job) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.job_tx.send(job).expect("worker pool queue closed");
    }

    /// Blocks until every job submitted so far has finished.
    ///
    /// Does not shut the pool down; further jobs may be submitted afterwards.
    pub fn wait_until_idle(&self) {
        while self.collected.load(Ordering::SeqCst) < self.submitted.load(Ordering::SeqCst) {
            match self.done_rx.recv() {
                Ok(()) => {
                    self.collected.fetch_add(1, Ordering::SeqCst);
                }
                // All workers gone; nothing left to wait for.
                Err(_) => break,
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.wait_until_idle();
        // Dropping `job_tx` closes the queue and ends the drain loops; the
        // rayon pool joins its threads when it drops right after.
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
