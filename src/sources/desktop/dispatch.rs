//! Fixed-size parser pool.
//!
//! ```text
//! walker thread ──(rank, path)──▶ bounded queue
//!                                    │
//!          ┌─────────────┬───────────┴───────────┐
//!      parser-0      parser-1        ...     parser-N-1
//!          └─────────────┴───────────┬───────────┘
//!                                    ▼
//!                         unbounded entry channel ──▶ caller
//! ```
//!
//! The entry channel disconnects once every parser has dropped its sender,
//! so draining it in the caller doubles as the barrier before dedup.

use crate::error::{Result, ScanError};
use crate::model::Entry;
use crossbeam_channel::{bounded, unbounded};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

/// Counts gathered while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Pairs taken off the queue
    pub candidates: u64,
    /// Parsed into a displayable entry
    pub displayable: u64,
    /// Parsed fine but not displayable
    pub hidden: u64,
    /// Per-file failures
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    candidates: AtomicU64,
    displayable: AtomicU64,
    hidden: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            candidates: self.candidates.load(Ordering::Relaxed),
            displayable: self.displayable.load(Ordering::Relaxed),
            hidden: self.hidden.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Runs a parse function over `(rank, path)` pairs on N worker threads
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    workers: usize,
    queue_capacity: usize,
}

impl Dispatcher {
    /// `queue_capacity` of 0 makes the walker hand over each pair directly.
    pub fn new(workers: usize, queue_capacity: usize) -> Result<Self> {
        if workers == 0 {
            return Err(ScanError::InvalidWorkerCount);
        }
        Ok(Self {
            workers,
            queue_capacity,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Feed `pairs` through the pool and collect every displayable entry.
    ///
    /// Output order is unspecified. Per-file errors are logged and counted;
    /// only a panicking thread or a failed spawn is returned as an error.
    pub fn run<I, F>(&self, pairs: I, parse: F) -> Result<(Vec<Entry>, DispatchStats)>
    where
        I: Iterator<Item = (usize, PathBuf)> + Send + 'static,
        F: Fn(usize, &Path) -> Result<Option<Entry>> + Send + Sync + 'static,
    {
        let (work_tx, work_rx) = bounded::<(usize, PathBuf)>(self.queue_capacity);
        let (entry_tx, entry_rx) = unbounded::<Entry>();
        let parse = Arc::new(parse);
        let counters = Arc::new(Counters::default());

        let producer = spawn_named("walker".to_string(), move || {
            for pair in pairs {
                // Fails only once every parser is gone
                if work_tx.send(pair).is_err() {
                    break;
                }
            }
        })?;

        let mut handles: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let work_rx = work_rx.clone();
            let entry_tx = entry_tx.clone();
            let parse = Arc::clone(&parse);
            let counters = Arc::clone(&counters);

            let name = format!("parser-{}", id);
            let handle = spawn_named(name.clone(), move || {
                for (rank, path) in work_rx.iter() {
                    counters.candidates.fetch_add(1, Ordering::Relaxed);
                    match parse(rank, &path) {
                        Ok(Some(entry)) => {
                            counters.displayable.fetch_add(1, Ordering::Relaxed);
                            if entry_tx.send(entry).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {
                            counters.hidden.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            warn!("Error checking file {:?}: {}", path, e);
                        }
                    }
                }
                debug!("Parser {} finished", id);
            })?;
            handles.push((name, handle));
        }

        // Only the workers may keep these alive
        drop(work_rx);
        drop(entry_tx);

        let entries: Vec<Entry> = entry_rx.iter().collect();

        join_named("walker".to_string(), producer)?;
        for (name, handle) in handles {
            join_named(name, handle)?;
        }

        Ok((entries, counters.snapshot()))
    }
}

fn spawn_named<F>(name: String, body: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|source| ScanError::Spawn { name, source })
}

fn join_named(name: String, handle: JoinHandle<()>) -> Result<()> {
    handle.join().map_err(|_| ScanError::ThreadPanicked { name })
}
