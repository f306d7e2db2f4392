//! File-backed item log.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::item::{TimeTrackingItem, ValidationError};
use crate::reader::{LineItemReader, ReadError};
use crate::writer::ItemWriter;

/// Errors from [`ItemLog`] operations.
#[derive(Debug, Error)]
pub enum LogError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Reader over a log file; a missing file reads as an empty log.
pub type LogReader = LineItemReader<Box<dyn BufRead>>;

/// The activity log at a fixed path.
#[derive(Debug, Clone)]
pub struct ItemLog {
    path: PathBuf,
}

impl ItemLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a reader over the log.
    pub fn reader(&self) -> Result<LogReader, ReadError> {
        match File::open(&self.path) {
            Ok(file) => {
                tracing::debug!(path = %self.path.display(), "opened item log");
                Ok(LineItemReader::new(Box::new(BufReader::new(file))))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "item log does not exist yet");
                Ok(LineItemReader::new(Box::new(io::empty())))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_all(&self) -> Result<Vec<TimeTrackingItem>, LogError> {
        let items = self.reader()?.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Starts `item`, ending a running item at `item`'s start.
    ///
    /// Returns the item that was ended, if any.
    pub fn start(&self, item: TimeTrackingItem) -> Result<Option<TimeTrackingItem>, LogError> {
        let items = self.read_all()?;
        let ended = match items.last() {
            Some(last) if item.is_ongoing() && last.is_ongoing() && last.start() < item.start() => {
                Some(last.clone().with_end(item.start())?)
            }
            _ => None,
        };
        self.place(items, item)?;
        tracing::debug!(ended = ended.is_some(), "started item");
        Ok(ended)
    }

    /// Adds `item` to the log, trimming or splitting the items it overlaps.
    pub fn insert(&self, item: TimeTrackingItem) -> Result<(), LogError> {
        let items = self.read_all()?;
        self.place(items, item)
    }

    /// Starts a new item with the comment of the last item at `at`.
    ///
    /// Returns the new item, or `None` if the log is empty or an item is
    /// still running.
    pub fn resume(&self, at: NaiveDateTime) -> Result<Option<TimeTrackingItem>, LogError> {
        let items = self.read_all()?;
        let Some(last) = items.last().filter(|last| !last.is_ongoing()) else {
            return Ok(None);
        };
        let item = TimeTrackingItem::new(last.comment().map(str::to_string), at);
        self.place(items, item.clone())?;
        tracing::debug!(start = %at, "resumed item");
        Ok(Some(item))
    }

    /// Ends the running item at `at`.
    ///
    /// Returns the finished item, or `None` if nothing was running.
    pub fn finish(&self, at: NaiveDateTime) -> Result<Option<TimeTrackingItem>, LogError> {
        let mut items = self.read_all()?;
        let Some(last) = items.pop() else {
            return Ok(None);
        };
        if !last.is_ongoing() {
            return Ok(None);
        }

        let finished = last.with_end(at)?;
        items.push(finished.clone());
        self.rewrite(&items)?;
        tracing::debug!(end = %at, "finished item");
        Ok(Some(finished))
    }

    /// Writes `item` into `items` on disk, appending when nothing overlaps.
    fn place(&self, items: Vec<TimeTrackingItem>, item: TimeTrackingItem) -> Result<(), LogError> {
        let appendable = items
            .last()
            .is_none_or(|last| last.end().is_some_and(|end| end <= item.start()));
        if appendable {
            return self.append(&item);
        }
        let items = fit(items, item)?;
        self.rewrite(&items)
    }

    fn append(&self, item: &TimeTrackingItem) -> Result<(), LogError> {
        let write = || -> io::Result<()> {
            self.ensure_parent()?;
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .append(true)
                .open(&self.path)?;
            if !ends_with_newline(&mut file)? {
                file.write_all(b"\n")?;
            }
            let mut writer = ItemWriter::new(BufWriter::new(file));
            writer.write(item)?;
            writer.into_inner()?;
            Ok(())
        };
        write().map_err(|source| self.write_error(source))
    }

    /// Replaces the log contents through a sibling temp file.
    fn rewrite(&self, items: &[TimeTrackingItem]) -> Result<(), LogError> {
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let write = || -> io::Result<()> {
            self.ensure_parent()?;
            let mut writer = ItemWriter::new(BufWriter::new(File::create(&tmp_path)?));
            writer.write_all(items)?;
            writer.into_inner()?.into_inner()?.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };
        write().map_err(|source| self.write_error(source))
    }

    fn ensure_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }

    fn write_error(&self, source: io::Error) -> LogError {
        LogError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Whether `file` is empty or its last byte is a line feed.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Fits `new` into time-ordered `items`.
///
/// Items entirely covered by `new` are removed, items reaching into it are
/// cut at its boundaries, and an item spanning it is split in two. An open
/// `new` item covers everything from its start on.
fn fit(
    items: Vec<TimeTrackingItem>,
    new: TimeTrackingItem,
) -> Result<Vec<TimeTrackingItem>, ValidationError> {
    let mut fitted = Vec::with_capacity(items.len() + 2);
    for item in items {
        let ends_before = item.end().is_some_and(|end| end <= new.start());
        let starts_after = new.end().is_some_and(|end| item.start() >= end);
        if ends_before || starts_after {
            fitted.push(item);
            continue;
        }

        if item.start() < new.start() {
            fitted.push(item.clone().with_end(new.start())?);
        }
        let rest_start = new
            .end()
            .filter(|new_end| item.end().is_none_or(|end| end > *new_end));
        if let Some(rest_start) = rest_start {
            fitted.push(item.with_start(rest_start)?);
        }
    }
    fitted.push(new);
    fitted.sort_by_key(TimeTrackingItem::start);
    Ok(fitted)
}
