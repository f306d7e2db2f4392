//! CLI subcommand implementations.

pub mod days;
pub mod fin;
pub mod on;
pub mod overtime;
pub mod resume;
pub mod status;
pub mod util;
