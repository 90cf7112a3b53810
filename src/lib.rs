//! desktop-list - canonical application catalog from XDG data directories
//!
//! Scans `<dir>/applications/*.desktop` for every directory of the search
//! path, keeps entries that are meant to be shown in a launcher and, when
//! the same file name exists in several directories, only the copy from the
//! earliest directory.
//!
//! # Pipeline
//!
//! ```text
//! search path ──▶ DirectoryWalker ──(rank, path)──▶ Dispatcher (N parsers)
//!                                                        │
//!                                                        ▼ Entry
//!                                               dedup_and_sort ──▶ Vec<Entry>
//! ```
//!
//! # Example
//!
//! ```no_run
//! use desktop_list::{DesktopSource, Source};
//! use std::path::PathBuf;
//!
//! let source = DesktopSource::new(vec![PathBuf::from("/usr/share")]).with_workers(4);
//! for entry in source.scan().unwrap() {
//!     println!("{}\t{}\t{}", entry.classification, entry.name, entry.command);
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod sources;

pub use config::Config;
pub use error::{ConfigError, Result, ScanError};
pub use model::{Classification, Entry};
pub use output::{OutputFormat, write_entries};
pub use sources::Source;
pub use sources::desktop::{DesktopSource, ScanStats};
