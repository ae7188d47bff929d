//! Assignment Status Value Object
//!
//! A team member's answer to a service assignment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status: {0}")]
pub struct UnknownStatus(pub String);

impl AssignmentStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Accepted => "accepted",
            AssignmentStatus::Declined => "declined",
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AssignmentStatus::Pending),
            "accepted" => Ok(AssignmentStatus::Accepted),
            "declined" => Ok(AssignmentStatus::Declined),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!("accepted".parse(), Ok(AssignmentStatus::Accepted));
        assert_eq!(" Declined ".parse(), Ok(AssignmentStatus::Declined));
        assert!("maybe".parse::<AssignmentStatus>().is_err());
        assert_eq!(AssignmentStatus::default(), AssignmentStatus::Pending);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&AssignmentStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
