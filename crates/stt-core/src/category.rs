//! Item classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Counts toward the working day.
    Worktime,
    /// Breaks and idle time.
    Break,
}

impl ItemCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Worktime => "worktime",
            Self::Break => "break",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies an item by its comment.
pub trait ItemCategorizer {
    fn category(&self, comment: Option<&str>) -> ItemCategory;
}

impl<C: ItemCategorizer + ?Sized> ItemCategorizer for &C {
    fn category(&self, comment: Option<&str>) -> ItemCategory {
        (**self).category(comment)
    }
}

/// Default break comments.
pub const DEFAULT_BREAK_COMMENTS: [&str; 3] = ["pause", "break", "coffee"];

/// Treats a fixed set of comments, and items without any comment, as breaks.
///
/// Matching ignores surrounding whitespace and ASCII case.
#[derive(Debug, Clone)]
pub struct BreakTimeCategorizer {
    break_comments: Vec<String>,
}

impl BreakTimeCategorizer {
    pub fn new<I, S>(break_comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            break_comments: break_comments
                .into_iter()
                .map(|c| c.as_ref().trim().to_ascii_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }
}

impl Default for BreakTimeCategorizer {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_COMMENTS)
    }
}

impl ItemCategorizer for BreakTimeCategorizer {
    fn category(&self, comment: Option<&str>) -> ItemCategory {
        let Some(comment) = comment else {
            return ItemCategory::Break;
        };
        let normalized = comment.trim();
        if self
            .break_comments
            .iter()
            .any(|c| c.eq_ignore_ascii_case(normalized))
        {
            ItemCategory::Break
        } else {
            ItemCategory::Worktime
        }
    }
}
