use anyhow::{Context, Result};
use clap::Parser;
use desktop_list::config::{self, XDG_DATA_DIRS, XDG_DATA_HOME};
use desktop_list::{DesktopSource, OutputFormat, write_entries};
use log::debug;
use std::env;
use std::ffi::OsString;
use std::io::{self, BufWriter, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "List launchable desktop applications from the XDG data directories",
    long_about = None
)]
struct Args {
    /// Number of parser threads (defaults to the config file, then 8)
    #[arg(short, long, value_name = "NUM", value_parser = parse_workers)]
    workers: Option<usize>,

    /// Colon separated data directories, overrides $XDG_DATA_DIRS
    #[arg(long, value_name = "DIRS")]
    data_dirs: Option<OsString>,

    /// Search the user data directory ($XDG_DATA_HOME) before all others
    #[arg(long)]
    data_home: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// Config file (defaults to the platform config dir)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log per-directory progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    // 1. Load Config
    let config = config::load_config(args.config.as_deref()).context("Failed to load config")?;
    let workers = args.workers.unwrap_or(config.general.workers);

    // 2. Resolve search path
    let from_env = env::var_os(XDG_DATA_DIRS);
    let data_home = if args.data_home {
        config::user_data_dir(env::var_os(XDG_DATA_HOME).as_deref())
    } else {
        None
    };
    let data_dirs = config::resolve_search_path(args.data_dirs.as_deref(), from_env.as_deref(), data_home)?;
    debug!("Search path: {:?}", data_dirs);

    // 3. Scan
    let source = DesktopSource::new(data_dirs)
        .with_workers(workers)
        .with_queue_capacity(config.general.queue_capacity)
        .with_classifier(config.classify.classifier());
    let (entries, _) = source.scan_with_stats().context("Scan failed")?;

    // 4. Print
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match write_entries(&mut out, &entries, args.format) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write output"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_must_be_positive() {
        assert!(Args::try_parse_from(["desktop-list", "--workers", "0"]).is_err());
        assert!(Args::try_parse_from(["desktop-list", "-w", "many"]).is_err());

        let args = Args::try_parse_from(["desktop-list", "-w", "3"]).unwrap();
        assert_eq!(args.workers, Some(3));

        let args = Args::try_parse_from(["desktop-list"]).unwrap();
        assert_eq!(args.workers, None);
        assert_eq!(args.format, OutputFormat::Tsv);
    }
}
