//! Plain text transcripts on disk.
//!
//! Each session appends every turn to its own incremental file
//! (`kai_<ts>.txt`) as it happens. When the session closes, the whole
//! conversation is written once more to a consolidated file
//! (`kai_complete_<ts>.txt`). Only consolidated files are offered
//! back to the user for reading.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use super::models::{ChatMessage, Transcript, format_line, to_display_line};
use crate::openai::Role;

const FILE_PREFIX: &str = "kai";
const FILE_EXTENSION: &str = "txt";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const COMPLETE_MARKER: &str = "complete";
pub const SEPARATOR: &str = "===";

fn file_timestamp() -> String {
    Local::now().format(FILE_TIMESTAMP_FORMAT).to_string()
}

/// Incremental files label the assistant `Ai` rather than using the
/// capitalized role name.
fn incremental_line(msg: &ChatMessage) -> String {
    match msg.role() {
        Role::User => to_display_line(msg),
        Role::Assistant => format_line("Ai", &msg.timestamp(), msg.content()),
    }
}

/// The history directory for one session.
#[derive(Debug)]
pub struct HistoryDir {
    dir: PathBuf,
    incremental_path: Option<PathBuf>,
}

impl HistoryDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            incremental_path: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// The incremental file for this session, once the first turn has
    /// been written.
    pub fn incremental_path(&self) -> Option<&Path> {
        self.incremental_path.as_deref()
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create history directory {}", self.dir.display())
        })
    }

    /// Adds one user/assistant pair followed by a separator line to
    /// the end of the incremental file. The file name is picked on
    /// the first call and reused for the rest of the session.
    pub fn append_incremental(
        &mut self,
        user_msg: &ChatMessage,
        assistant_msg: &ChatMessage,
    ) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = match &self.incremental_path {
            Some(path) => path.clone(),
            None => {
                let path = self.dir.join(format!(
                    "{}_{}.{}",
                    FILE_PREFIX,
                    file_timestamp(),
                    FILE_EXTENSION
                ));
                tracing::info!("Recording session to {}", path.display());
                self.incremental_path = Some(path.clone());
                path
            }
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open transcript {}", path.display()))?;
        writeln!(file, "{}", incremental_line(user_msg))?;
        writeln!(file, "{}", incremental_line(assistant_msg))?;
        writeln!(file, "{}", SEPARATOR)?;

        Ok(path)
    }

    /// Writes the entire conversation to a new consolidated file, one
    /// display line per message. Does nothing for an empty
    /// conversation.
    pub fn write_consolidated(&self, transcript: &Transcript) -> Result<Option<PathBuf>> {
        if transcript.is_empty() {
            return Ok(None);
        }
        self.ensure_dir()?;

        let path = self.dir.join(format!(
            "{}_{}_{}.{}",
            FILE_PREFIX,
            COMPLETE_MARKER,
            file_timestamp(),
            FILE_EXTENSION
        ));
        let body = transcript
            .iter()
            .map(to_display_line)
            .collect::<Vec<String>>()
            .join("\n");
        fs::write(&path, body)
            .with_context(|| format!("Failed to write transcript {}", path.display()))?;

        tracing::info!(
            "Saved {} messages to {}",
            transcript.len(),
            path.display()
        );
        Ok(Some(path))
    }

    /// Names (without extension) of the consolidated transcripts in
    /// the directory. Order is whatever the filesystem returns.
    pub fn list_consolidated_sessions(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem.contains(COMPLETE_MARKER) {
                    names.push(stem.to_string());
                }
            }
        }

        Ok(names)
    }

    /// Full text of a stored transcript by base name, or `None` if
    /// there is no such file. Names that would point outside the
    /// directory never match a transcript.
    pub fn read(&self, name: &str) -> Result<Option<String>> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            tracing::warn!("Ignoring transcript name outside history directory: {}", name);
            return Ok(None);
        }

        let path = self.dir.join(format!("{}.{}", name, FILE_EXTENSION));
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?;
        Ok(Some(text))
    }
}
