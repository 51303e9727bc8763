//! Persisted configuration as a replayable command script.
//!
//! No crate in this pack pulls in a serialization format for persisting
//! device configuration, and introducing one here just to save a handful
//! of pin modes would be its own dependency to justify. Instead boot-time
//! configuration is a newline-separated list of the same `io-mode`/
//! `io-flag`/`status-trigger` command lines the command channel already
//! parses (SPEC_FULL §6, resolving the corresponding Open Question in
//! §9): loading config is replaying it through
//! `capsules_core::command::dispatch_line`; saving it is recording every
//! config-mutating line as it is dispatched live and writing that log
//! back out.

use std::fs;
use std::path::Path;

use capsules_core::command;
use capsules_core::io_core::IoCore;

use crate::error::BoardError;

/// Lines beginning with any of these verbs mutate persistent pin
/// configuration; `io-read`/`io-write`/`dump*` are transient operations
/// and are not recorded.
const PERSISTED_VERBS: &[&str] = &["io-mode", "io-flag", "status-trigger", "ntp"];

pub fn is_persisted(line: &str) -> bool {
    let verb = line.split_whitespace().next().unwrap_or("");
    PERSISTED_VERBS.contains(&verb)
}

/// Replays every non-blank, non-comment line in `path` through the
/// command dispatcher. Dispatch errors are logged and skipped rather
/// than aborting the boot sequence, so one bad line in a hand-edited
/// config file doesn't take the rest of it down with it.
pub fn replay(path: &Path, io: &mut IoCore) -> Result<(), BoardError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no config file at {}, starting with all pins disabled", path.display());
            return Ok(());
        }
        Err(source) => {
            return Err(BoardError::ConfigRead { path: path.display().to_string(), source })
        }
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let response = command::dispatch_line(line, io);
        if response.starts_with("ERROR") {
            log::warn!("config replay: '{}' -> {}", line, response);
        }
    }
    Ok(())
}

/// Accumulates persisted config lines as they are dispatched live, and
/// writes the accumulated script back to disk on request.
#[derive(Default)]
pub struct ConfigLog {
    lines: Vec<String>,
}

impl ConfigLog {
    pub fn new() -> Self {
        ConfigLog::default()
    }

    pub fn record(&mut self, line: &str) {
        if is_persisted(line) {
            self.lines.push(line.to_string());
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), BoardError> {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(path, text).map_err(|source| BoardError::ConfigWrite {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mode_affecting_verbs_are_persisted() {
        assert!(is_persisted("io-mode gpio 0 timer up 500"));
        assert!(is_persisted("io-flag set gpio 0 autostart"));
        assert!(is_persisted("status-trigger gpio 0"));
        assert!(is_persisted("ntp pool.ntp.org UTC"));
        assert!(!is_persisted("io-read gpio 0"));
        assert!(!is_persisted("io-write gpio 0 1"));
        assert!(!is_persisted("dump"));
    }

    #[test]
    fn log_round_trips_through_a_file() {
        let mut log = ConfigLog::new();
        log.record("io-mode gpio 0 outputd");
        log.record("io-read gpio 0");
        log.record("io-flag set gpio 0 autostart");

        let dir = std::env::temp_dir().join(format!("iobridge-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.txt");
        log.save(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        fs::remove_file(&path).unwrap();
    }
}
