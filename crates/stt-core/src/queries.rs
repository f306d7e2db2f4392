//! Queries over a full pass of an item reader.

use std::collections::BTreeSet;

use crate::item::TimeTrackingItem;
use crate::reader::{ItemReader, ReadError};

/// Feeds every item to `visit`, closing the reader on all paths.
fn for_each_item<R, F>(mut reader: R, mut visit: F) -> Result<(), ReadError>
where
    R: ItemReader,
    F: FnMut(TimeTrackingItem),
{
    let result = loop {
        match reader.read() {
            Ok(Some(item)) => visit(item),
            Ok(None) => break Ok(()),
            Err(err) => break Err(err),
        }
    };
    reader.close();
    result
}

/// Returns the last item if it is still running.
pub fn ongoing_item<R: ItemReader>(reader: R) -> Result<Option<TimeTrackingItem>, ReadError> {
    let mut last = None;
    for_each_item(reader, |item| last = Some(item))?;
    Ok(last.filter(TimeTrackingItem::is_ongoing))
}

/// The items right before and right after an item, when there is no gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacentItems {
    pub previous: Option<TimeTrackingItem>,
    pub next: Option<TimeTrackingItem>,
}

/// Finds the neighbours of the first item equal to `item`.
///
/// A neighbour only counts if it ends exactly where `item` starts, or starts
/// exactly where `item` ends.
pub fn adjacent_items<R: ItemReader>(
    reader: R,
    item: &TimeTrackingItem,
) -> Result<AdjacentItems, ReadError> {
    let mut adjacent = AdjacentItems::default();
    let mut before: Option<TimeTrackingItem> = None;
    let mut found = false;
    let mut done = false;
    for_each_item(reader, |current| {
        if done {
            return;
        }
        if found {
            if item.end() == Some(current.start()) {
                adjacent.next = Some(current);
            }
            done = true;
        } else if current == *item {
            found = true;
            adjacent.previous = before.take().filter(|prev| prev.end() == Some(item.start()));
        } else {
            before = Some(current);
        }
    })?;
    Ok(adjacent)
}

/// Returns the first item, in stream order, of each day.
pub fn first_items_of_days<R: ItemReader>(reader: R) -> Result<Vec<TimeTrackingItem>, ReadError> {
    let mut seen = BTreeSet::new();
    let mut firsts = Vec::new();
    for_each_item(reader, |item| {
        if seen.insert(item.day()) {
            firsts.push(item);
        }
    })?;
    Ok(firsts)
}
