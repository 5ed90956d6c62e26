//! Session logging.
//!
//! A [`SessionLog`] writes every message to the console through the crate's
//! colored macros and, when constructed with a file path, appends the same
//! message to a plain-text session log.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use chrono::Local;

use crate::{error, info, success, warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Level::Info => "",
            Level::Success => "✔ ",
            Level::Warn => "! ",
            Level::Error => "✘ ",
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionLog {
    file: Option<PathBuf>,
    file_failed: AtomicBool,
}

impl SessionLog {
    /// Creates a logger. `None` disables the file sink.
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            file,
            file_failed: AtomicBool::new(false),
        }
    }

    /// Console-only logger.
    pub fn console() -> Self {
        Self::new(None)
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message.as_ref());
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.log(Level::Success, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(Level::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, message.as_ref());
    }

    pub fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => info!("{}", message),
            Level::Success => success!("{}", message),
            Level::Warn => warning!("{}", message),
            Level::Error => error!("{}", message),
        }
        self.write_to_file(level, message);
    }

    fn write_to_file(&self, level: Level, message: &str) {
        let Some(path) = &self.file else {
            return;
        };

        if let Err(e) = append_line(path, &format_line(level, message)) {
            // report once, the run goes on without the file
            if !self.file_failed.swap(true, Ordering::Relaxed) {
                warning!("Cannot write session log {}: {}", path.display(), e);
            }
        }
    }
}

fn format_line(level: Level, message: &str) -> String {
    format!(
        "[{}] [{}] {}{}\n",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"),
        level.label(),
        level.prefix(),
        message
    )
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}
