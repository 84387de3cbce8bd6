//! Console logger behind the `log` facade.
//!
//! Info goes to stdout, warnings and errors to stderr. With `--logfile` every
//! emitted line is also appended to a file with ANSI sequences removed.
//! While a progress bar is registered, terminal output is drawn above it.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use indicatif::ProgressBar;
use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use crate::error::CliError;

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Suspend `bar` around every log line until [`clear_active_bar`].
pub(crate) fn set_active_bar(bar: &ProgressBar) {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = Some(bar.clone());
    }
}

pub(crate) fn clear_active_bar() {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = None;
    }
}

pub(crate) fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|active| active.clone())
}

/// Open `path` for appending, creating it if needed.
fn open_logfile(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    logfile: Option<Mutex<File>>,
}

impl CliLogger {
    fn write_logfile(&self, level: Level, line: &str) {
        let Some(ref file) = self.logfile else {
            return;
        };
        let plain = strip_ansi_escapes::strip_str(line);
        if let Ok(mut f) = file.lock() {
            let _ = writeln!(
                f,
                "{} {:<5} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                plain
            );
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        let line = if self.timestamps {
            format!(
                "{} {}",
                chrono::Local::now()
                    .format("%H:%M:%S%.3f")
                    .if_supports_color(Stdout, |t| t.dimmed()),
                message
            )
        } else {
            message
        };

        let emit = || match record.level() {
            Level::Error => eprintln!(
                "{} {}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                line
            ),
            Level::Warn => eprintln!(
                "{} {}",
                "warning:".if_supports_color(Stderr, |t| t.yellow()),
                line
            ),
            Level::Info => println!("{}", line),
            Level::Debug | Level::Trace => {
                println!("{}", line.if_supports_color(Stdout, |t| t.dimmed()))
            }
        };
        match active_bar() {
            Some(bar) => bar.suspend(emit),
            None => emit(),
        }

        self.write_logfile(record.level(), &line);
    }

    fn flush(&self) {
        if let Some(Ok(mut f)) = self.logfile.as_ref().map(|file| file.lock()) {
            let _ = f.flush();
        }
    }
}

/// Install the logger. `verbose` wins over `quiet`.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let logfile = logfile.map(open_logfile).transpose()?.map(Mutex::new);

    log::set_boxed_logger(Box::new(CliLogger {
        level,
        timestamps: verbose,
        logfile,
    }))
    .map_err(|e| CliError::other(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logfile_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("romshelf.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let mut file = open_logfile(&path).unwrap();
        writeln!(file, "this run").unwrap();
        drop(file);

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "earlier run\nthis run\n"
        );
    }

    #[test]
    fn test_logfile_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.log");
        open_logfile(&path).unwrap();
        assert!(path.is_file());
    }
}
