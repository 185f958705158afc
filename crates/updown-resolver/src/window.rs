//! Epoch-aligned window math
//!
//! A contract covers one fixed-duration window aligned to the epoch. One
//! window is computed per resolution call and never stored.

/// Start of the window containing `now`.
pub fn window_start(now: i64, duration_secs: i64) -> i64 {
    (now / duration_secs) * duration_secs
}

/// Candidate window starts in priority order: current, previous, next.
///
/// Previous is ranked ahead of next because discovery indexing trails real
/// time rather than leading it; around a boundary the still-listed contract
/// is almost always the one that just ended.
pub fn candidate_window_starts(now: i64, duration_secs: i64, include_adjacent: bool) -> Vec<i64> {
    let current = window_start(now, duration_secs);
    if !include_adjacent {
        return vec![current];
    }
    vec![current, current - duration_secs, current + duration_secs]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start_alignment() {
        for (now, duration) in [(1_700_000_300, 300), (1_700_000_300, 900), (1_699_999_999, 3600)]
        {
            let start = window_start(now, duration);
            assert_eq!(start % duration, 0);
            assert!(start <= now && now < start + duration);
        }
    }

    #[test]
    fn test_window_start_exact_boundary() {
        assert_eq!(window_start(1_700_000_100, 300), 1_700_000_100);
    }

    #[test]
    fn test_candidate_starts_priority_order() {
        let starts = candidate_window_starts(1_700_000_300, 300, true);
        assert_eq!(starts, vec![1_700_000_100, 1_699_999_800, 1_700_000_400]);
    }

    #[test]
    fn test_candidate_starts_current_only() {
        let starts = candidate_window_starts(1_700_000_300, 300, false);
        assert_eq!(starts, vec![1_700_000_100]);
    }
}
