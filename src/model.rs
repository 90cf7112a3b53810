use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Path heuristics attached to an entry. Informational only, never used
/// for deduplication or ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Found under the user's personal tree. `false` means "system".
    pub user: bool,
    /// Found under a Flatpak-style sandboxed installation.
    pub sandboxed: bool,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.user { "user" } else { "system" })?;
        if self.sandboxed {
            f.write_str(" flatpak")?;
        }
        Ok(())
    }
}

/// One displayable application discovered in a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub rank: usize,           // Index of the base directory it came from
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,         // Source .desktop file
    pub name: String,          // Logical name, e.g. "firefox" for firefox.desktop
    pub command: String,       // Exec value with field codes removed
    #[serde(flatten)]
    pub classification: Classification,
}

// File names need not be UTF-8; JSON strings must be.
fn serialize_path_lossy<S: Serializer>(path: &PathBuf, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

impl Entry {
    pub fn new(rank: usize, path: PathBuf, name: String, command: String, classification: Classification) -> Self {
        Self {
            rank,
            path,
            name,
            command,
            classification,
        }
    }
}
