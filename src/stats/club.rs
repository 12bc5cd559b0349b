//! Club Matchup Optimizer
//!
//! Assigns club teams to club-battle opponents to maximize total expected
//! points. Opponent counts are single digits, so the assignment is solved
//! exactly by exhaustive search rather than a relaxation.

use thiserror::Error;

use crate::stats::winprob::WinModel;

/// Points for a win against opponent slot 1 through 4.
pub const WIN_POINTS: [f64; 4] = [130.0, 120.0, 110.0, 100.0];
/// Points for a tie.
pub const TIE_POINTS: [f64; 4] = [26.0, 24.0, 22.0, 20.0];
/// Points for a loss.
pub const LOSS_POINTS: [f64; 4] = [13.0, 12.0, 11.0, 10.0];

#[derive(Debug, Error, PartialEq)]
pub enum ClubError {
    #[error("at most {max} opponents supported, {given} provided")]
    TooManyOpponents { max: usize, given: usize },
    #[error("{opponents} opponents but {healths} health values provided")]
    HealthMismatch { opponents: usize, healths: usize },
    #[error("opponent health must be between 0 and 1, got {0}")]
    BadHealth(f64),
}

/// The chosen attack plan: for each club team, the opponent slot it
/// attacks (or none), plus the plan's total expected points.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPlan {
    pub assignments: Vec<Option<usize>>,
    pub expected_points: f64,
}

/// Expected points for every (team, opponent) pairing.
///
/// Each cell weights the slot's win/tie/loss points by the team's
/// win/tie/loss probability, scaled by the opponent's remaining health.
pub fn expected_points_matrix(
    model: &WinModel,
    team_prs: &[i64],
    opponent_prs: &[i64],
    opponent_healths: &[f64],
) -> Result<Vec<Vec<f64>>, ClubError> {
    if opponent_prs.len() > WIN_POINTS.len() {
        return Err(ClubError::TooManyOpponents {
            max: WIN_POINTS.len(),
            given: opponent_prs.len(),
        });
    }
    if opponent_healths.len() != opponent_prs.len() {
        return Err(ClubError::HealthMismatch {
            opponents: opponent_prs.len(),
            healths: opponent_healths.len(),
        });
    }
    for &health in opponent_healths {
        if !(0.0..=1.0).contains(&health) {
            return Err(ClubError::BadHealth(health));
        }
    }

    let matrix = team_prs
        .iter()
        .map(|&pr| {
            model
                .calc(pr, opponent_prs)
                .iter()
                .enumerate()
                .map(|(j, wtl)| {
                    let raw = WIN_POINTS[j] * wtl[0]
                        + TIE_POINTS[j] * wtl[1]
                        + LOSS_POINTS[j] * wtl[2];
                    raw * opponent_healths[j]
                })
                .collect()
        })
        .collect();
    Ok(matrix)
}

/// Exhaustively pick the assignment of teams to opponents maximizing the
/// summed matrix cells, each opponent attacked by at most one team.
pub fn optimize_assignments(expected: &[Vec<f64>]) -> AttackPlan {
    let mut best = AttackPlan {
        assignments: vec![None; expected.len()],
        expected_points: 0.0,
    };
    let mut current = vec![None; expected.len()];
    search(expected, 0, 0u32, 0.0, &mut current, &mut best);
    best
}

fn search(
    expected: &[Vec<f64>],
    team: usize,
    used: u32,
    total: f64,
    current: &mut Vec<Option<usize>>,
    best: &mut AttackPlan,
) {
    if team == expected.len() {
        if total > best.expected_points {
            best.expected_points = total;
            best.assignments = current.clone();
        }
        return;
    }

    // Leave this team out of the battle.
    current[team] = None;
    search(expected, team + 1, used, total, current, best);

    for (opponent, &points) in expected[team].iter().enumerate() {
        if used & (1 << opponent) != 0 {
            continue;
        }
        current[team] = Some(opponent);
        search(
            expected,
            team + 1,
            used | (1 << opponent),
            total + points,
            current,
            best,
        );
    }
    current[team] = None;
}
