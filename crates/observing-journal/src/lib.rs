//! Observing Journal
//!
//! A single-user, append-only log of observations kept as a JSON array on
//! disk. The store is loaded once at startup and rewritten on every append.
//!
//! A journal file that cannot be read or parsed is treated as empty so the
//! planner keeps working across storage format changes. The next append
//! moves the unreadable file aside to `<name>.bak` before writing, so hand
//! edits that broke the JSON can be recovered.
//!
//! Writes go to a temporary file in the journal's directory which is then
//! renamed over the journal; a crash mid-write leaves the old file intact.

use serde::{Deserialize, Deserializer, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error("Journal entry needs a target name")]
    MissingTarget,
}

pub type Result<T> = std::result::Result<T, JournalError>;

/// One logged observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Date as the observer recorded it
    pub date: String,
    pub target: String,
    /// 1 (poor) to 5 (excellent)
    #[serde(deserialize_with = "rating_from_number_or_string")]
    pub rating: u8,
    #[serde(default)]
    pub instrument: String,
    #[serde(default)]
    pub notes: String,
}

impl JournalEntry {
    /// Build an entry from raw form input; text fields are trimmed
    pub fn new(date: &str, target: &str, rating: u8, instrument: &str, notes: &str) -> Result<Self> {
        let entry = Self {
            date: date.trim().to_string(),
            target: target.trim().to_string(),
            rating,
            instrument: instrument.trim().to_string(),
            notes: notes.trim().to_string(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(JournalError::MissingTarget);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(JournalError::InvalidRating(self.rating));
        }
        Ok(())
    }
}

/// Older journals stored the rating as the raw form string ("4")
fn rating_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRating {
        Number(u8),
        Text(String),
    }

    match RawRating::deserialize(deserializer)? {
        RawRating::Number(n) => Ok(n),
        RawRating::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// File-backed journal with load-on-open, append-on-submit lifecycle
#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    entries: Vec<JournalEntry>,
}

impl JournalStore {
    /// Open the journal at `path`. Never fails: a missing, unreadable or
    /// malformed file yields an empty journal.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries_or_empty(&path);
        info!("Journal {:?}: {} entries", path, entries.len());
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries newest first, the order they are shown in
    pub fn newest_first(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate and append an entry, then rewrite the journal file.
    ///
    /// The file is re-read first so entries written by an earlier run are
    /// kept even if this store was opened before them. An existing file
    /// that does not parse is renamed to a backup, never overwritten.
    pub fn append(&mut self, entry: JournalEntry) -> Result<()> {
        entry.validate()?;

        let mut entries = match load_entries(&self.path) {
            Loaded::Entries(entries) => entries,
            Loaded::Missing => Vec::new(),
            Loaded::Unreadable => {
                let backup = back_up(&self.path)?;
                warn!("Moved unreadable journal {:?} to {:?}", self.path, backup);
                Vec::new()
            }
        };
        entries.push(entry);
        write_entries(&self.path, &entries)?;

        info!(
            "Logged observation #{} to {:?}",
            entries.len(),
            self.path
        );
        self.entries = entries;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

enum Loaded {
    Entries(Vec<JournalEntry>),
    Missing,
    Unreadable,
}

fn load_entries(path: &Path) -> Loaded {
    match read_entries(path) {
        Ok(entries) => Loaded::Entries(entries),
        Err(JournalError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!("No journal at {:?} yet", path);
            Loaded::Missing
        }
        Err(e) => {
            warn!("Ignoring unreadable journal {:?}: {}", path, e);
            Loaded::Unreadable
        }
    }
}

fn read_entries_or_empty(path: &Path) -> Vec<JournalEntry> {
    match load_entries(path) {
        Loaded::Entries(entries) => entries,
        Loaded::Missing | Loaded::Unreadable => Vec::new(),
    }
}

/// First free `<name>.bak`, `<name>.bak.1`, ... next to the journal
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".bak");
    let first = path.with_file_name(&name);

    let mut candidate = first.clone();
    let mut n = 1;
    while candidate.exists() {
        let mut numbered = name.clone();
        numbered.push(format!(".{}", n));
        candidate = path.with_file_name(numbered);
        n += 1;
    }
    candidate
}

fn back_up(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::rename(path, &backup)?;
    Ok(backup)
}

fn write_entries(path: &Path, entries: &[JournalEntry]) -> Result<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
