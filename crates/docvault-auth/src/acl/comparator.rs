//! Access-level comparison.

use docvault_entity::permission::AccessLevel;

/// Whether `held` satisfies a requirement of `required`.
///
/// Compares by rank, never by name.
pub fn at_least(held: AccessLevel, required: AccessLevel) -> bool {
    held.rank() >= required.rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least() {
        assert!(at_least(AccessLevel::Admin, AccessLevel::Read));
        assert!(at_least(AccessLevel::Write, AccessLevel::Read));
        assert!(!at_least(AccessLevel::Read, AccessLevel::Write));
        assert!(!at_least(AccessLevel::Write, AccessLevel::Admin));
    }

    #[test]
    fn test_reflexive() {
        for level in AccessLevel::ALL {
            assert!(at_least(level, level));
        }
    }
}
