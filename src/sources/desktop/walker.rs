//! Enumerates candidate entry files under `<base>/applications`.

use super::parser::DESKTOP_SUFFIX;
use log::debug;
use std::fs::{self, ReadDir};
use std::iter::Enumerate;
use std::path::PathBuf;
use std::vec::IntoIter;

pub const APPLICATIONS_DIR: &str = "applications";

/// Lazy, single-pass iterator of `(rank, path)` pairs.
///
/// Base directories are visited in the order given, `rank` being the
/// position in that list. Within one directory the listing order of the
/// filesystem is kept. Unreadable `applications` directories are skipped.
pub struct DirectoryWalker {
    bases: Enumerate<IntoIter<PathBuf>>,
    current: Option<(usize, ReadDir)>,
}

impl DirectoryWalker {
    pub fn new(bases: Vec<PathBuf>) -> Self {
        Self {
            bases: bases.into_iter().enumerate(),
            current: None,
        }
    }
}

impl Iterator for DirectoryWalker {
    type Item = (usize, PathBuf);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((rank, listing)) = self.current.as_mut() {
                for dirent in listing.by_ref() {
                    let dirent = match dirent {
                        Ok(d) => d,
                        Err(e) => {
                            debug!("Skipping unreadable directory entry: {}", e);
                            continue;
                        }
                    };
                    let is_dir = match dirent.file_type() {
                        Ok(ft) => ft.is_dir(),
                        Err(e) => {
                            debug!("Skipping {:?}: {}", dirent.path(), e);
                            continue;
                        }
                    };
                    if is_dir || !dirent.file_name().to_string_lossy().ends_with(DESKTOP_SUFFIX) {
                        continue;
                    }
                    return Some((*rank, dirent.path()));
                }
            }
            self.current = None;

            let (rank, base) = self.bases.next()?;
            let dir = base.join(APPLICATIONS_DIR);
            match fs::read_dir(&dir) {
                Ok(listing) => {
                    debug!("Scanning desktop files in {:?} (rank {})", dir, rank);
                    self.current = Some((rank, listing));
                }
                Err(e) => debug!("Skipping {:?}: {}", dir, e),
            }
        }
    }
}
