//! Application discovery over XDG data directories.
//!
//! Walker → parser pool → dedup/sort. See [`DesktopSource::scan_with_stats`].

pub mod dedup;
pub mod dispatch;
pub mod parser;
pub mod walker;

use crate::error::Result;
use crate::model::Entry;
use crate::sources::Source;
use dedup::dedup_and_sort;
use dispatch::Dispatcher;
use log::info;
use parser::{Classifier, parse_desktop_file};
use std::path::PathBuf;
use walker::DirectoryWalker;

pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Summary of one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub candidates: u64,
    pub displayable: u64,
    pub hidden: u64,
    pub failed: u64,
    pub retained: usize,
}

/// Scans `<dir>/applications` for every base directory, lowest index first.
#[derive(Debug, Clone)]
pub struct DesktopSource {
    data_dirs: Vec<PathBuf>,
    workers: usize,
    queue_capacity: usize,
    classifier: Classifier,
}

impl DesktopSource {
    pub fn new(data_dirs: Vec<PathBuf>) -> Self {
        Self {
            data_dirs,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            classifier: Classifier::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    /// Run the full pipeline once. Unreadable directories and files never
    /// fail the scan; they are skipped (and files counted in `failed`).
    pub fn scan_with_stats(&self) -> Result<(Vec<Entry>, ScanStats)> {
        let dispatcher = Dispatcher::new(self.workers, self.queue_capacity)?;
        let walker = DirectoryWalker::new(self.data_dirs.clone());
        let classifier = self.classifier.clone();

        let (entries, dispatched) =
            dispatcher.run(walker, move |rank, path| parse_desktop_file(path, rank, &classifier))?;

        let entries = dedup_and_sort(entries);
        let stats = ScanStats {
            candidates: dispatched.candidates,
            displayable: dispatched.displayable,
            hidden: dispatched.hidden,
            failed: dispatched.failed,
            retained: entries.len(),
        };

        info!(
            "DesktopSource: {} candidates in {} directories, {} displayable, {} hidden, {} failed, {} after dedup",
            stats.candidates,
            self.data_dirs.len(),
            stats.displayable,
            stats.hidden,
            stats.failed,
            stats.retained
        );
        Ok((entries, stats))
    }
}

impl Source for DesktopSource {
    fn scan(&self) -> anyhow::Result<Vec<Entry>> {
        let (entries, _) = self.scan_with_stats()?;
        Ok(entries)
    }
}
