//! Project lifecycle labels.
//!
//! Statuses are stored as plain text so hand-edited imports with unfamiliar
//! labels are kept rather than rejected; [`ProjectStatus::from_label`] returns
//! `None` for those.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Potential,
    NotStarted,
    InProgress,
    Blocked,
    Delivered,
    Completed,
}

/// Board sections the projects log groups statuses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusGroup {
    Potential,
    Active,
    Blocked,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [Self; 6] = [
        Self::Potential,
        Self::NotStarted,
        Self::InProgress,
        Self::Blocked,
        Self::Delivered,
        Self::Completed,
    ];

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Potential => "Potential",
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Blocked => "Blocked",
            Self::Delivered => "Delivered",
            Self::Completed => "Completed",
        }
    }

    /// Not started, in progress and delivered projects are all "active".
    #[must_use]
    pub const fn group(self) -> StatusGroup {
        match self {
            Self::Potential => StatusGroup::Potential,
            Self::NotStarted | Self::InProgress | Self::Delivered => StatusGroup::Active,
            Self::Blocked => StatusGroup::Blocked,
            Self::Completed => StatusGroup::Completed,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(ProjectStatus::from_label("in progress"), None);
    }

    #[test]
    fn test_groups() {
        assert_eq!(ProjectStatus::Delivered.group(), StatusGroup::Active);
        assert_eq!(ProjectStatus::NotStarted.group(), StatusGroup::Active);
        assert_eq!(ProjectStatus::Blocked.group(), StatusGroup::Blocked);
    }
}
