//! Log setup.
//!
//! The TUI owns the terminal, so logs go to a JSON-lines file instead of
//! stderr. Level comes from `RUST_LOG`, defaulting to `interview=info`.
//! Only the newest [`KEEP_FILES`] log files are kept.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Log files left in the directory after a new one is created.
pub const KEEP_FILES: usize = 20;

/// Install the global subscriber writing to a fresh file in `dir`.
///
/// Returns the log file path.
pub fn init(dir: &Path) -> Result<PathBuf, String> {
    fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {e}", dir.display()))?;

    let stamp = jiff::Zoned::now().strftime("%Y%m%d-%H%M%S").to_string();
    let path = dir.join(format!("interview-{stamp}.jsonl"));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("failed to open {}: {e}", path.display()))?;

    if let Err(e) = prune(dir, KEEP_FILES) {
        eprintln!("warning: failed to prune old logs in {}: {e}", dir.display());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "interview=info".into()))
        .try_init()
        .map_err(|e| format!("failed to install logger: {e}"))?;

    Ok(path)
}

/// Delete all but the newest `keep` `interview-*.jsonl` files in `dir`.
///
/// File names carry a sortable timestamp, so name order is age order.
fn prune(dir: &Path, keep: usize) -> std::io::Result<usize> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("interview-") && n.ends_with(".jsonl"))
        })
        .collect();
    logs.sort();

    let excess = logs.len().saturating_sub(keep);
    for path in &logs[..excess] {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn prune_keeps_the_newest_logs() {
        let dir = TempDir::new().unwrap();
        for stamp in ["20261014-090000", "20261015-090000", "20261016-090000"] {
            fs::write(dir.path().join(format!("interview-{stamp}.jsonl")), "").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(prune(dir.path(), 2).unwrap(), 1);

        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(
            left,
            [
                "interview-20261015-090000.jsonl",
                "interview-20261016-090000.jsonl",
                "notes.txt",
            ]
        );
    }

    #[test]
    fn prune_under_the_limit_removes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("interview-20261016-090000.jsonl"), "").unwrap();
        assert_eq!(prune(dir.path(), KEEP_FILES).unwrap(), 0);
    }
}
