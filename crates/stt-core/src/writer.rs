//! Writes items in the persisted line format.

use std::io::{self, Write};

use crate::codec;
use crate::item::TimeTrackingItem;

/// Writes one encoded item per line.
#[derive(Debug)]
pub struct ItemWriter<W> {
    sink: W,
}

impl<W: Write> ItemWriter<W> {
    pub const fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write(&mut self, item: &TimeTrackingItem) -> io::Result<()> {
        writeln!(self.sink, "{}", codec::encode(item))
    }

    pub fn write_all<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a TimeTrackingItem>,
    ) -> io::Result<()> {
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
