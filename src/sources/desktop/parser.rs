//! Entry file parsing.
//!
//! Only the first group of a `.desktop` file is inspected: scanning stops at
//! the first blank line, so `[Desktop Action ...]` groups never override the
//! main `Exec=` line.

use crate::error::{Result, ScanError};
use crate::model::{Classification, Entry};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const DESKTOP_SUFFIX: &str = ".desktop";

// Arguments are never passed through, so every field code is dropped.
// https://specifications.freedesktop.org/desktop-entry-spec/latest/exec-variables.html
// "@@u" must stay ahead of "@@".
const FIELD_CODES: [&str; 15] = [
    "%f", "%F", "%u", "%U", "%d", "%D", "%n", "%N", "%i", "%c", "%k", "%v", "%m", "@@u", "@@",
];

/// Path heuristics used to tag entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    pub user_prefix: String,
    pub sandbox_marker: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            user_prefix: "/home".to_string(),
            sandbox_marker: "/flatpak".to_string(),
        }
    }
}

impl Classifier {
    pub fn classify(&self, path: &Path) -> Classification {
        let path = path.to_string_lossy();
        Classification {
            user: path.starts_with(&self.user_prefix),
            sandboxed: path.contains(&self.sandbox_marker),
        }
    }
}

/// Parse one entry file found in the base directory at `rank`.
///
/// `Ok(None)` means the file is not displayable (hidden, terminal-only,
/// not an application or without a command). Only I/O failures are errors.
pub fn parse_desktop_file(path: &Path, rank: usize, classifier: &Classifier) -> Result<Option<Entry>> {
    let file = File::open(path).map_err(|source| ScanError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let raw_exec = match first_group_exec(BufReader::new(file)).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })? {
        Some(exec) => exec,
        None => return Ok(None),
    };

    let Some(name) = logical_name(path) else {
        return Ok(None);
    };

    Ok(Some(Entry::new(
        rank,
        path.to_path_buf(),
        name,
        normalize_exec(&raw_exec),
        classifier.classify(path),
    )))
}

/// Scan the first group and return its raw `Exec=` value if the group
/// describes a displayable application.
pub fn first_group_exec<R: BufRead>(mut reader: R) -> io::Result<Option<String>> {
    let mut is_application = false;
    let mut exec = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(strip_line_ending(&buf));

        if line.starts_with("NoDisplay=true") || line.starts_with("Terminal=true") {
            return Ok(None);
        } else if line.starts_with("Type=Application") {
            is_application = true;
        } else if let Some(value) = line.strip_prefix("Exec=") {
            exec = value.to_string();
        } else if line.trim().is_empty() {
            break;
        }
    }

    if !is_application || exec.is_empty() {
        return Ok(None);
    }
    Ok(Some(exec))
}

/// Remove field codes and turn tabs into spaces so the command fits in one
/// tab-separated column. Surrounding whitespace is left as is.
pub fn normalize_exec(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    'scan: while let Some(c) = rest.chars().next() {
        for code in FIELD_CODES {
            if let Some(after) = rest.strip_prefix(code) {
                rest = after;
                continue 'scan;
            }
        }
        out.push(if c == '\t' { ' ' } else { c });
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// File name without the `.desktop` suffix, `None` when that leaves nothing.
pub fn logical_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let name = file_name.strip_suffix(DESKTOP_SUFFIX).unwrap_or(&file_name);
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn exec_of(content: &str) -> Option<String> {
        first_group_exec(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_minimal_application() {
        let content = "[Desktop Entry]\nType=Application\nName=Foo\nExec=foo --bar\n";
        assert_eq!(exec_of(content).as_deref(), Some("foo --bar"));
    }

    #[test]
    fn test_hidden_and_terminal_short_circuit() {
        let hidden = "[Desktop Entry]\nType=Application\nExec=foo\nNoDisplay=true\n";
        assert_eq!(exec_of(hidden), None);

        let terminal = "[Desktop Entry]\nTerminal=true\nType=Application\nExec=htop\n";
        assert_eq!(exec_of(terminal), None);

        let not_hidden = "[Desktop Entry]\nType=Application\nExec=foo\nNoDisplay=false\nTerminal=false\n";
        assert_eq!(exec_of(not_hidden).as_deref(), Some("foo"));
    }

    #[test]
    fn test_missing_type_or_exec() {
        assert_eq!(exec_of("[Desktop Entry]\nExec=foo\n"), None);
        assert_eq!(exec_of("[Desktop Entry]\nType=Application\n"), None);
        assert_eq!(exec_of("[Desktop Entry]\nType=Link\nExec=foo\n"), None);
        assert_eq!(exec_of("[Desktop Entry]\nType=Application\nExec=\n"), None);
        assert_eq!(exec_of(""), None);
    }

    #[test]
    fn test_later_exec_overwrites_earlier() {
        let content = "Type=Application\nExec=first\nExec=second\n";
        assert_eq!(exec_of(content).as_deref(), Some("second"));
    }

    #[test]
    fn test_exec_keeps_everything_after_first_equals() {
        let content = "Type=Application\nExec=env FOO=bar app\n";
        assert_eq!(exec_of(content).as_deref(), Some("env FOO=bar app"));
    }

    #[test]
    fn test_only_first_group_is_inspected() {
        let content = "[Desktop Entry]\nType=Application\nExec=firefox %u\n\n\
                       [Desktop Action new-private-window]\nExec=firefox --private-window %u\nNoDisplay=true\n";
        assert_eq!(exec_of(content).as_deref(), Some("firefox %u"));
    }

    #[test]
    fn test_whitespace_only_line_ends_group() {
        let content = "Type=Application\n  \t\nExec=late\n";
        assert_eq!(exec_of(content), None);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let content = "Type=Application\r\nExec=foo\r\n\r\nExec=bar";
        assert_eq!(exec_of(content).as_deref(), Some("foo"));

        assert_eq!(exec_of("Type=Application\nExec=tail").as_deref(), Some("tail"));
    }

    #[test]
    fn test_prefixes_are_not_trimmed() {
        let content = " Type=Application\nExec=foo\n";
        assert_eq!(exec_of(content), None);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let content: &[u8] = b"Type=Application\nName=\xff\xfe\nExec=foo\n\n";
        assert_eq!(first_group_exec(content).unwrap().as_deref(), Some("foo"));
    }

    #[test]
    fn test_normalize_exec() {
        assert_eq!(normalize_exec("firefox %u %U --new-window"), "firefox   --new-window");
        assert_eq!(normalize_exec("app %f%F%d%D%n%N%i%c%k%v%m"), "app ");
        assert_eq!(normalize_exec("app\t--flag\t%U"), "app --flag ");
        assert_eq!(normalize_exec("app @@u %U @@"), "app   ");
        assert_eq!(normalize_exec("app --percent 100%"), "app --percent 100%");
        assert_eq!(normalize_exec("caf\u{e9} %u"), "caf\u{e9} ");
    }

    #[test]
    fn test_normalize_does_not_rescan_output() {
        // "%%u": the first '%' is kept, then "%u" is removed
        assert_eq!(normalize_exec("echo %%u"), "echo %");
        assert_eq!(normalize_exec("@@@u"), "@u");
    }

    #[test]
    fn test_logical_name() {
        assert_eq!(
            logical_name(Path::new("/usr/share/applications/org.gnome.Nautilus.desktop")).as_deref(),
            Some("org.gnome.Nautilus")
        );
        assert_eq!(logical_name(Path::new("/usr/share/applications/.desktop")), None);
        assert_eq!(logical_name(Path::new("/")), None);
    }

    #[test]
    fn test_classifier() {
        let classifier = Classifier::default();

        let c = classifier.classify(Path::new("/usr/share/applications/foo.desktop"));
        assert!(!c.user && !c.sandboxed);

        let c = classifier.classify(Path::new("/home/u/.local/share/applications/foo.desktop"));
        assert!(c.user && !c.sandboxed);

        let c = classifier.classify(Path::new(
            "/home/u/.local/share/flatpak/exports/share/applications/org.foo.desktop",
        ));
        assert!(c.user && c.sandboxed);

        let c = classifier.classify(Path::new("/var/lib/flatpak/exports/share/applications/org.foo.desktop"));
        assert!(!c.user && c.sandboxed);
    }

    #[test]
    fn test_parse_desktop_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editor.desktop");
        fs::write(&path, "[Desktop Entry]\nType=Application\nName=Editor\nExec=editor\t%F\n").unwrap();

        let entry = parse_desktop_file(&path, 3, &Classifier::default()).unwrap().unwrap();
        assert_eq!(entry.rank, 3);
        assert_eq!(entry.name, "editor");
        assert_eq!(entry.command, "editor ");
        assert_eq!(entry.path, path);
    }

    #[test]
    fn test_parse_missing_file_is_per_file_error() {
        let dir = tempdir().unwrap();
        let path: PathBuf = dir.path().join("gone.desktop");

        let err = parse_desktop_file(&path, 0, &Classifier::default()).unwrap_err();
        assert!(matches!(err, ScanError::Open { .. }));
        assert!(err.is_per_file());
    }
}
