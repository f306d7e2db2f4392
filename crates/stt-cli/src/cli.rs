//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Simple time tracker.
///
/// Records activities in a plain-text log and reports overtime against a
/// configured working-time schedule.
#[derive(Debug, Parser)]
#[command(name = "stt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an activity, ending the running one.
    ///
    /// The description may end in a time expression: `since 9:00`,
    /// `10 min ago`, or `from 9:00 to 10:30` to add a finished activity.
    On {
        /// What you are working on, with an optional time expression.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        comment: Vec<String>,
    },

    /// End the running activity, now or `at <time>`.
    Fin {
        /// Optional `at <time>`.
        #[arg(num_args = 0.., trailing_var_arg = true)]
        when: Vec<String>,
    },

    /// Restart the last finished activity now.
    Resume,

    /// Show the running activity.
    Status,

    /// List tracked days with their first activity.
    Days {
        /// Only show days on or after this date (YYYY-MM-DD).
        #[arg(long)]
        since: Option<NaiveDate>,
    },

    /// Report overtime per day.
    Overtime {
        /// Only show days on or after this date (YYYY-MM-DD).
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
