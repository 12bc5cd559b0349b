//! GI Calculator
//!
//! Splits a target GI total across the 5 base stats, proportionally to
//! how far each stat sits above the 40 floor, with leftover points going
//! to the highest base stats first.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GiError {
    #[error("only {0} base stats provided, must provide 5")]
    WrongStatCount(usize),
    #[error("invalid base stats: all base stats must be at least 40")]
    StatBelowFloor,
    #[error("base stats sum to exactly 200; GI cannot be distributed")]
    NoHeadroom,
}

/// Calculate the GI distribution for a target GI given base stats.
///
/// Each stat receives `floor((stat - 40) / (sum - 200) * target)` points;
/// whatever the floors leave over (at most 4 points) is handed out one
/// point at a time in descending base-stat order. The result always sums
/// to the target.
pub fn calc_gi(base_stats: &[u32], gi_target: u32) -> Result<[u32; 5], GiError> {
    if base_stats.len() != 5 {
        return Err(GiError::WrongStatCount(base_stats.len()));
    }
    if base_stats.iter().any(|&stat| stat < 40) {
        return Err(GiError::StatBelowFloor);
    }

    let total: u64 = base_stats.iter().map(|&s| u64::from(s)).sum();
    let headroom = total - 200;
    if headroom == 0 {
        // All stats at the floor leaves nothing to weight by.
        if gi_target == 0 {
            return Ok([0; 5]);
        }
        return Err(GiError::NoHeadroom);
    }

    let mut gi = [0u32; 5];
    for (slot, &stat) in gi.iter_mut().zip(base_stats) {
        *slot = (u64::from(stat - 40) * u64::from(gi_target) / headroom) as u32;
    }

    // Descending base stat, ties by original order.
    let mut order: [usize; 5] = [0, 1, 2, 3, 4];
    order.sort_by_key(|&i| std::cmp::Reverse(base_stats[i]));

    let leftover = gi_target - gi.iter().sum::<u32>();
    for &idx in order.iter().take(leftover as usize) {
        gi[idx] += 1;
    }
    Ok(gi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_sums_to_target() {
        let gi = calc_gi(&[92, 98, 95, 88, 85], 60).unwrap();
        assert_eq!(gi.iter().sum::<u32>(), 60);
    }

    #[test]
    fn test_proportional_weighting() {
        // Headroom 10/20/30/40/100, sum 200, target 20: exact shares
        // 1/2/3/4/10 with no leftover.
        let gi = calc_gi(&[50, 60, 70, 80, 140], 20).unwrap();
        assert_eq!(gi, [1, 2, 3, 4, 10]);
    }

    #[test]
    fn test_leftover_goes_to_highest_stats_first() {
        // Equal headroom of 10 each, target 7: floors give 1 apiece and
        // the 2 leftover points land on the two highest (tied, so the
        // first two in order).
        let gi = calc_gi(&[50, 50, 50, 50, 50], 7).unwrap();
        assert_eq!(gi, [2, 2, 1, 1, 1]);
        assert_eq!(gi.iter().sum::<u32>(), 7);
    }

    #[test]
    fn test_zero_target() {
        assert_eq!(calc_gi(&[60, 70, 80, 90, 100], 0).unwrap(), [0; 5]);
    }

    #[test]
    fn test_wrong_count_rejected() {
        assert_eq!(
            calc_gi(&[50, 50, 50], 10).unwrap_err(),
            GiError::WrongStatCount(3)
        );
    }

    #[test]
    fn test_stat_below_floor_rejected() {
        assert_eq!(
            calc_gi(&[39, 50, 50, 50, 50], 10).unwrap_err(),
            GiError::StatBelowFloor
        );
    }

    #[test]
    fn test_all_stats_at_floor() {
        assert_eq!(calc_gi(&[40; 5], 0).unwrap(), [0; 5]);
        assert_eq!(calc_gi(&[40; 5], 10).unwrap_err(), GiError::NoHeadroom);
    }
}
