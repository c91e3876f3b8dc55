//! File-backed scope slot
//!
//! The file holds `name=value` entries, one per line, values URL-encoded.
//! Entries under other names are preserved. Clearing deletes the entry line
//! (and the file once it is empty) rather than writing an empty value.
//!
//! The file is shared by every process pointing at the same path, but each
//! process keeps its own in-memory mirror and its own refresh coordinator:
//! a change made by one process is only seen by another after it reloads.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shopwire_core::ScopeStorage;
use shopwire_domain::{ClientConfig, Result, ShopwireError};
use tracing::debug;

/// [`ScopeStorage`] persisted to a small entry file.
pub struct FileScopeStorage {
    path: PathBuf,
    key: String,
    lock: Mutex<()>,
}

impl FileScopeStorage {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self { path: path.into(), key: key.into(), lock: Mutex::new(()) }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.scope_store_path.clone(), config.scope_key.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().map(ToString::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(storage_error(&self.path, "read", &e)),
        }
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        if lines.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    Err(storage_error(&self.path, "remove", &e))
                }
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, "create", &e))?;
        }

        let mut contents = lines.join("\n");
        contents.push('\n');

        // Write-then-rename so a crash never leaves a half-written file.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, contents).map_err(|e| storage_error(&staging, "write", &e))?;
        fs::rename(&staging, &self.path).map_err(|e| storage_error(&self.path, "replace", &e))
    }

    fn is_entry(&self, line: &str) -> bool {
        line.split_once('=').is_some_and(|(name, _)| name.trim() == self.key)
    }
}

impl ScopeStorage for FileScopeStorage {
    fn load(&self) -> Result<Option<String>> {
        let _guard = self.lock.lock();

        let lines = self.read_lines()?;
        let Some(raw) = lines
            .iter()
            .find(|line| self.is_entry(line))
            .and_then(|line| line.split_once('='))
            .map(|(_, value)| value.trim())
        else {
            return Ok(None);
        };

        let value = urlencoding::decode(raw).map_err(|e| {
            let path = self.path.display();
            ShopwireError::Storage(format!("corrupt {} entry in {path}: {e}", self.key))
        })?;
        Ok(Some(value.into_owned()))
    }

    fn store(&self, value: &str) -> Result<()> {
        let _guard = self.lock.lock();

        let mut lines: Vec<String> =
            self.read_lines()?.into_iter().filter(|line| !self.is_entry(line)).collect();
        lines.push(format!("{}={}", self.key, urlencoding::encode(value)));

        debug!(path = %self.path.display(), key = %self.key, "Persisting scope");
        self.write_lines(&lines)
    }

    fn remove(&self) -> Result<()> {
        let _guard = self.lock.lock();

        let lines = self.read_lines()?;
        let kept: Vec<String> = lines.iter().filter(|line| !self.is_entry(line)).cloned().collect();
        if kept.len() == lines.len() {
            return Ok(());
        }

        debug!(path = %self.path.display(), key = %self.key, "Removing persisted scope");
        self.write_lines(&kept)
    }
}

fn storage_error(path: &Path, action: &str, err: &std::io::Error) -> ShopwireError {
    ShopwireError::Storage(format!("failed to {action} {}: {err}", path.display()))
}
