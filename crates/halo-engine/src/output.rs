//! Elapsed-time log file.
//!
//! A run writes its wall-clock time, in seconds with six decimals, to a
//! file named after its decomposition so that runs at different rank and
//! thread counts can be collected side by side.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// `log_<ranks>_<threads>`.
pub fn log_file_name(ranks: usize, threads: usize) -> String {
    format!("log_{ranks}_{threads}")
}

/// Elapsed seconds as written to the log file.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.6}", elapsed.as_secs_f64())
}

/// Write `elapsed` to `dir/log_<ranks>_<threads>`, replacing any
/// previous file. Returns the path written.
pub fn write_elapsed_log(
    dir: &Path,
    ranks: usize,
    threads: usize,
    elapsed: Duration,
) -> io::Result<PathBuf> {
    let path = dir.join(log_file_name(ranks, threads));
    fs::write(&path, format_elapsed(elapsed))?;
    Ok(path)
}
