//! Completion stamps
//!
//! A stamp is a file named after a command inside the workspace stamp
//! directory. Its existence means the command already ran. Stamps are
//! written only after the command's verb succeeded, so a failed or
//! interrupted command is retried on the next run.
//!
//! Command names are used literally except for `%`, path separators and a
//! leading `.`, which are escaped as `%XX` so every stamp is a single file
//! directly inside the stamp directory.

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Persisted "command already ran" markers
#[derive(Debug, Clone)]
pub struct StampStore {
    dir: PathBuf,
    ignore_stamps: bool,
}

impl StampStore {
    /// Stamp store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ignore_stamps: false,
        }
    }

    /// Treat every command as not done, forcing re-execution
    #[must_use]
    pub fn ignoring_stamps(mut self, ignore: bool) -> Self {
        self.ignore_stamps = ignore;
        self
    }

    /// Stamp directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn stamp_path(&self, command: &str) -> PathBuf {
        self.dir.join(encode_file_name(command))
    }

    /// Whether `command` already completed
    pub fn is_done(&self, command: &str) -> bool {
        !self.ignore_stamps && self.stamp_path(command).is_file()
    }

    /// Record that `command` completed
    ///
    /// No-op when stamps are ignored; a forced run leaves the stamp set
    /// untouched.
    pub fn mark_done(&self, command: &str) -> Result<(), FilesystemError> {
        if self.ignore_stamps {
            tracing::debug!(command, "Stamps ignored, not writing stamp");
            return Ok(());
        }
        filesystem::create_dir_all(&self.dir)?;
        filesystem::write_file(&self.stamp_path(command), &timestamp_now())?;
        tracing::debug!(command, "Stamp written");
        Ok(())
    }

    /// All stamped commands, sorted
    pub fn list(&self) -> Result<Vec<String>, FilesystemError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = filesystem::list_file_names(&self.dir)?
            .iter()
            .map(|name| decode_file_name(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Remove the stamp for `command`; false if there was none
    pub fn clear(&self, command: &str) -> Result<bool, FilesystemError> {
        let path = self.stamp_path(command);
        if !path.is_file() {
            return Ok(false);
        }
        filesystem::remove_file(&path)?;
        Ok(true)
    }

    /// Remove every stamp, returning how many were removed
    pub fn clear_all(&self) -> Result<usize, FilesystemError> {
        let names = self.list()?;
        for name in &names {
            filesystem::remove_file(&self.stamp_path(name))?;
        }
        Ok(names.len())
    }
}

/// File name for `command`
fn encode_file_name(command: &str) -> String {
    let mut name = String::with_capacity(command.len());
    for (i, c) in command.char_indices() {
        match c {
            '%' | '/' | '\\' | '\0' => name.push_str(&format!("%{:02X}", u32::from(c))),
            '.' if i == 0 => name.push_str("%2E"),
            _ => name.push(c),
        }
    }
    name
}

/// Command for a stamp file name; malformed escapes are kept as written
fn decode_file_name(name: &str) -> String {
    let mut command = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find('%') {
        command.push_str(&rest[..pos]);
        let escaped = rest
            .get(pos + 1..pos + 3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                command.push(char::from(byte));
                rest = &rest[pos + 3..];
            }
            None => {
                command.push('%');
                rest = &rest[pos + 1..];
            }
        }
    }
    command.push_str(rest);
    command
}

/// Seconds since the epoch, stored as stamp content
fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}
