//! Train Probability
//!
//! Probability that training a card to a target level produces a
//! distribution satisfying a condition. Each training point lands on one
//! of the 5 stats uniformly at random; the probability of a target set is
//! the number of point-orderings reaching it over 5^points.

use thiserror::Error;

use crate::stats::condition::Condition;

/// Points granted per training level.
const POINTS_PER_LEVEL: u32 = 3;

/// Maximum number of levels a single projection may span.
const MAX_LEVEL_SPAN: u32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrainError {
    #[error("must have exactly 5 values in current train, {0} provided")]
    WrongStatCount(usize),
    #[error("current train invalid: total must be a multiple of 3")]
    NotLevelAligned,
    #[error("target level {target} must be 0 to {max} levels beyond level {current}")]
    TargetOutOfRange { target: u32, current: u32, max: u32 },
}

/// Visit every way to place `total` points into `bins` stats.
///
/// Tuples come out in the same order as the stars-and-bars enumeration:
/// lexicographic over separator positions.
pub fn for_each_partition<F>(bins: usize, total: u32, visit: &mut F)
where
    F: FnMut(&[u32]),
{
    let mut current = vec![0u32; bins];
    fill_partition(&mut current, 0, total, visit);
}

fn fill_partition<F>(current: &mut [u32], idx: usize, remaining: u32, visit: &mut F)
where
    F: FnMut(&[u32]),
{
    if idx == current.len() - 1 {
        current[idx] = remaining;
        visit(current);
        return;
    }
    for value in 0..=remaining {
        current[idx] = value;
        fill_partition(current, idx + 1, remaining - value, visit);
    }
}

/// Binomial coefficient C(n, k).
fn binomial(n: u32, k: u32) -> u128 {
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..u128::from(k) {
        result = result * (u128::from(n) - i) / (i + 1);
    }
    result
}

/// Number of point-orderings that produce exactly this distribution:
/// the multinomial coefficient (sum)! / (d0! d1! ... d4!).
///
/// Computed as a product of binomials over partial sums so intermediate
/// values stay inside u128 for every train a card can actually reach.
pub fn exact_train_count(distribution: &[u32]) -> u128 {
    let mut count: u128 = 1;
    let mut partial = 0u32;
    for &d in distribution {
        partial += d;
        count *= binomial(partial, d);
    }
    count
}

/// Probability, 0 to 1, that training from `cur_train` to `target_level`
/// lands on a distribution satisfying `condition`.
pub fn calc_train_probability(
    cur_train: &[u32],
    target_level: u32,
    condition: &Condition,
) -> Result<f64, TrainError> {
    if cur_train.len() != 5 {
        return Err(TrainError::WrongStatCount(cur_train.len()));
    }
    let spent: u32 = cur_train.iter().sum();
    if spent % POINTS_PER_LEVEL != 0 {
        return Err(TrainError::NotLevelAligned);
    }
    let completed_levels = spent / POINTS_PER_LEVEL;
    if target_level < completed_levels || target_level - completed_levels > MAX_LEVEL_SPAN {
        return Err(TrainError::TargetOutOfRange {
            target: target_level,
            current: completed_levels,
            max: MAX_LEVEL_SPAN,
        });
    }

    // The card sits at level spent/3 + 1; only the points between that
    // level and the target remain random.
    let cur_level = completed_levels + 1;
    if target_level < cur_level {
        // Target already reached: nothing left to roll.
        return Ok(0.0);
    }
    let points_left = POINTS_PER_LEVEL * (target_level - cur_level);

    let base: [u32; 5] = [
        cur_train[0],
        cur_train[1],
        cur_train[2],
        cur_train[3],
        cur_train[4],
    ];

    let mut matching: f64 = 0.0;
    for_each_partition(5, points_left, &mut |delta| {
        let mut stats = base;
        for (slot, &d) in stats.iter_mut().zip(delta) {
            *slot += d;
        }
        if condition.eval(&stats) {
            matching += exact_train_count(delta) as f64;
        }
    });

    Ok(matching / 5f64.powi(points_left as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_partitions(bins: usize, total: u32) -> Vec<Vec<u32>> {
        let mut out = Vec::new();
        for_each_partition(bins, total, &mut |p| out.push(p.to_vec()));
        out
    }

    #[test]
    fn test_partition_count_is_stars_and_bars() {
        // C(t + n - 1, n - 1)
        assert_eq!(collect_partitions(5, 3).len(), 35);
        assert_eq!(collect_partitions(5, 6).len(), 210);
        assert_eq!(collect_partitions(3, 4).len(), 15);
    }

    #[test]
    fn test_partitions_sum_to_total() {
        for p in collect_partitions(5, 6) {
            assert_eq!(p.iter().sum::<u32>(), 6);
        }
    }

    #[test]
    fn test_zero_total_single_partition() {
        assert_eq!(collect_partitions(5, 0), vec![vec![0, 0, 0, 0, 0]]);
    }

    #[test]
    fn test_exact_train_count() {
        // 3!/(1!1!1!) over three slots of one point each
        assert_eq!(exact_train_count(&[1, 1, 1, 0, 0]), 6);
        // All points on one stat: single ordering
        assert_eq!(exact_train_count(&[6, 0, 0, 0, 0]), 1);
        // 4!/(2!2!) = 6
        assert_eq!(exact_train_count(&[2, 2, 0, 0, 0]), 6);
    }

    #[test]
    fn test_counts_cover_all_orderings() {
        // Sum of counts over all partitions of t points equals 5^t.
        let mut total: u128 = 0;
        for_each_partition(5, 6, &mut |p| total += exact_train_count(p));
        assert_eq!(total, 5u128.pow(6));
    }

    #[test]
    fn test_trivial_condition_has_probability_one() {
        let always = Condition::parse("CON >= 0").unwrap();
        let p = calc_train_probability(&[0, 0, 0, 0, 0], 5, &always).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_impossible_condition_has_probability_zero() {
        // Only 12 points will be rolled on top of zero.
        let never = Condition::parse("CON > 50").unwrap();
        let p = calc_train_probability(&[0, 0, 0, 0, 0], 5, &never).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_single_point_on_named_stat() {
        // From level sum 0 (level 1) to level 2: 3 points roll. P(all three
        // on CON) = 1/125; P(CON >= 1) = 1 - (4/5)^3.
        let cond = Condition::parse("CON == 3").unwrap();
        let p = calc_train_probability(&[0, 0, 0, 0, 0], 2, &cond).unwrap();
        assert!((p - 1.0 / 125.0).abs() < 1e-12);

        let cond = Condition::parse("CON >= 1").unwrap();
        let p = calc_train_probability(&[0, 0, 0, 0, 0], 2, &cond).unwrap();
        let expected = 1.0 - (4f64 / 5.0).powi(3);
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_current_train_contributes_to_condition() {
        // Already holding 6 points of POW; condition met before rolling.
        let cond = Condition::parse("POW >= 6").unwrap();
        let p = calc_train_probability(&[0, 6, 0, 0, 0], 4, &cond).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_target_at_current_level_rolls_nothing() {
        // Sum 6 -> card is at level 3; target 3 leaves no points to roll,
        // so the outcome is already decided.
        let cond = Condition::parse("POW >= 6").unwrap();
        let p = calc_train_probability(&[0, 6, 0, 0, 0], 3, &cond).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_target_below_current_level() {
        let cond = Condition::parse("POW >= 0").unwrap();
        let p = calc_train_probability(&[0, 6, 0, 0, 0], 2, &cond).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_input_validation() {
        let cond = Condition::parse("CON > 0").unwrap();
        assert_eq!(
            calc_train_probability(&[1, 1, 1], 5, &cond).unwrap_err(),
            TrainError::WrongStatCount(3)
        );
        assert_eq!(
            calc_train_probability(&[1, 1, 0, 0, 0], 5, &cond).unwrap_err(),
            TrainError::NotLevelAligned
        );
        assert!(matches!(
            calc_train_probability(&[0, 0, 0, 0, 0], 21, &cond).unwrap_err(),
            TrainError::TargetOutOfRange { .. }
        ));
    }

    #[test]
    fn test_monte_carlo_agreement() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let cond = Condition::parse("CON + POW >= 8").unwrap();
        let exact = calc_train_probability(&[0, 0, 0, 0, 0], 5, &cond).unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let trials = 200_000;
        let mut hits = 0u32;
        for _ in 0..trials {
            let mut stats = [0u32; 5];
            for _ in 0..12 {
                stats[rng.gen_range(0..5)] += 1;
            }
            if cond.eval(&stats) {
                hits += 1;
            }
        }
        let observed = f64::from(hits) / f64::from(trials);
        assert!(
            (observed - exact).abs() < 0.01,
            "exact {} vs observed {}",
            exact,
            observed
        );
    }
}
