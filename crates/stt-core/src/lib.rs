//! Core domain logic for the simple time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Items: tracked activities with a start, optional end and optional comment
//! - Persistence: the line format, sequential readers/writers and the log file
//! - Reporting: per-day overtime against a working-time schedule

pub mod category;
pub mod clock;
pub mod codec;
pub mod duration;
mod item;
pub mod log;
pub mod overtime;
pub mod queries;
pub mod reader;
pub mod working_time;
mod writer;

pub use category::{BreakTimeCategorizer, ItemCategorizer, ItemCategory};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::ParseError;
pub use item::{TimeTrackingItem, ValidationError};
pub use log::{ItemLog, LogError};
pub use overtime::{OvertimeReport, OvertimeReportGenerator};
pub use reader::{ItemReader, LineItemReader, ReadError};
pub use working_time::{WeeklyWorkingTime, WorkingTimeProvider};
pub use writer::ItemWriter;
