//! Rendering of scan results.

use crate::model::Entry;
use clap::ValueEnum;
use std::io::{self, Write};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<classification>\t<name>\t<command>` per line
    #[default]
    Tsv,
    /// One JSON object per line
    Json,
}

pub fn write_entries<W: Write>(out: &mut W, entries: &[Entry], format: OutputFormat) -> io::Result<()> {
    for entry in entries {
        match format {
            OutputFormat::Tsv => {
                writeln!(out, "{}\t{}\t{}", entry.classification, entry.name, entry.command)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, entry)?;
                out.write_all(b"\n")?;
            }
        }
    }
    out.flush()
}
