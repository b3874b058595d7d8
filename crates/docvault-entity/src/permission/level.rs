//! Access level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level granted by an access-control entry.
///
/// Totally ordered by rank: Read < Write < Admin. The derived ordering
/// follows declaration order, which matches [`AccessLevel::rank`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "access_level", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    /// View content and metadata.
    Read,
    /// Modify content, create children.
    Write,
    /// Full control, including managing grants.
    Admin,
}

impl AccessLevel {
    /// All levels, lowest first.
    pub const ALL: [AccessLevel; 3] = [Self::Read, Self::Write, Self::Admin];

    /// Return the rank (higher = more privileged).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Read => 1,
            Self::Write => 2,
            Self::Admin => 3,
        }
    }

    /// Return the level as an uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = docvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(docvault_core::AppError::validation(format!(
                "Invalid access level: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_not_lexical() {
        // "ADMIN" < "READ" lexically; rank must win.
        assert!(AccessLevel::Admin > AccessLevel::Read);
        assert!(AccessLevel::Write > AccessLevel::Read);
        assert!(AccessLevel::Admin.rank() > AccessLevel::Write.rank());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("write".parse::<AccessLevel>().unwrap(), AccessLevel::Write);
        assert_eq!("ADMIN".parse::<AccessLevel>().unwrap(), AccessLevel::Admin);
        assert!("owner".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&AccessLevel::Read).unwrap();
        assert_eq!(json, "\"READ\"");
    }
}
