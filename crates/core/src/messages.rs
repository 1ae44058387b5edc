//! Message read-state rule.
//!
//! Marking a message as read is idempotent: the first call stamps `read_at`,
//! later calls leave the original timestamp in place. `read_at` is therefore
//! never cleared and never moves backward.

use crate::types::Timestamp;

/// Resolve the `read_at` value to store when the recipient marks a message read.
pub fn resolve_read_at(current: Option<Timestamp>, now: Timestamp) -> Timestamp {
    current.unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn first_read_stamps_now() {
        let now = Utc::now();
        assert_eq!(resolve_read_at(None, now), now);
    }

    #[test]
    fn repeat_read_keeps_original_timestamp() {
        let first = Utc::now();
        let later = first + Duration::seconds(30);
        assert_eq!(resolve_read_at(Some(first), later), first);
    }

    #[test]
    fn earlier_clock_never_moves_read_at_backward() {
        let first = Utc::now();
        let skewed = first - Duration::hours(1);
        assert_eq!(resolve_read_at(Some(first), skewed), first);
    }
}
