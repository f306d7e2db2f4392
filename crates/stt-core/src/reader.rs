//! Sequential item readers.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::codec::{self, ParseError};
use crate::item::TimeTrackingItem;

/// Errors raised while reading items from a source.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying source failed.
    #[error("failed to read item log: {0}")]
    Io(#[from] io::Error),

    /// A record could not be decoded.
    #[error("invalid record on line {line}: {source}")]
    Parse {
        /// 1-based physical line number.
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// A forward-only source of items.
///
/// Implementations own their underlying resource and release it in
/// [`close`](Self::close), which must be safe to call more than once.
pub trait ItemReader {
    /// Returns the next item, or `None` once the source is exhausted.
    fn read(&mut self) -> Result<Option<TimeTrackingItem>, ReadError>;

    /// Releases the underlying source.
    fn close(&mut self);
}

impl<R: ItemReader + ?Sized> ItemReader for &mut R {
    fn read(&mut self) -> Result<Option<TimeTrackingItem>, ReadError> {
        (**self).read()
    }

    fn close(&mut self) {
        (**self).close();
    }
}

/// Reads one item per line from a buffered source.
///
/// Blank lines are skipped. The source is dropped on [`close`](ItemReader::close),
/// when it is exhausted, when it reports an I/O error, or when the reader
/// itself is dropped, whichever happens first.
#[derive(Debug)]
pub struct LineItemReader<R> {
    source: Option<R>,
    line: Vec<u8>,
    line_number: usize,
}

impl LineItemReader<BufReader<File>> {
    /// Opens the log file at `path`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        tracing::debug!(path = %path.display(), "opened item log");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineItemReader<R> {
    pub const fn new(source: R) -> Self {
        Self {
            source: Some(source),
            line: Vec::new(),
            line_number: 0,
        }
    }

    /// Whether the underlying source has been released.
    pub const fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Reads the next physical line into `self.line`, without terminator.
    /// Returns `false` at end of input.
    fn next_line(&mut self) -> io::Result<bool> {
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };
        self.line.clear();
        if source.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        if self.line.ends_with(b"\n") {
            self.line.pop();
            if self.line.ends_with(b"\r") {
                self.line.pop();
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> ItemReader for LineItemReader<R> {
    fn read(&mut self) -> Result<Option<TimeTrackingItem>, ReadError> {
        loop {
            match self.next_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.close();
                    return Ok(None);
                }
                Err(err) => {
                    self.close();
                    return Err(err.into());
                }
            }

            let parse_error = |source| ReadError::Parse {
                line: self.line_number,
                source,
            };
            let line = std::str::from_utf8(&self.line).map_err(|err| {
                parse_error(ParseError::InvalidUtf8 {
                    offset: err.valid_up_to(),
                })
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let item = codec::decode(line).map_err(parse_error)?;
            tracing::trace!(line = self.line_number, start = %item.start(), "read item");
            return Ok(Some(item));
        }
    }

    fn close(&mut self) {
        if self.source.take().is_some() {
            tracing::debug!(lines = self.line_number, "closed item log");
        }
    }
}

impl<R: BufRead> Iterator for LineItemReader<R> {
    type Item = Result<TimeTrackingItem, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}
