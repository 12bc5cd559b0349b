//! Ranked Win Probability
//!
//! Win/tie/loss probability against an opponent, from a 3-class logistic
//! model over [own PR, opponent PR]. Models are fitted from the recorded
//! ranked results CSV, one model per gear state, and persisted as JSON so
//! later invocations skip refitting.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Class order inside the model: win, tie, loss.
const CLASSES: [char; 3] = ['W', 'T', 'L'];

/// Loss points keyed by opponent tier; tier value doubles as win points.
/// Single digits are ranked tiers, triple digits are club tiers.
const TIER_LOSS_POINTS: [(i64, f64); 9] = [
    (8, -20.0),
    (10, -14.0),
    (12, -12.0),
    (14, -10.0),
    (20, -8.0),
    (100, 10.0),
    (110, 11.0),
    (120, 12.0),
    (130, 13.0),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointsError {
    #[error("invalid opponent tier {0}; must be one of 8, 10, 12, 14, 20, 100, 110, 120, 130")]
    InvalidTier(i64),
    #[error("{opponents} opponent PRs but {tiers} tiers provided")]
    LengthMismatch { opponents: usize, tiers: usize },
}

/// One recorded ranked game.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub geared: bool,
    pub pr: f64,
    pub opponent_pr: f64,
    /// 'W', 'T', or 'L'.
    pub result: char,
}

/// A fitted 3-class logistic model over standardized [pr, opponent_pr].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinModel {
    pub feature_mean: [f64; 2],
    pub feature_std: [f64; 2],
    /// Per-class weights over the 2 features.
    pub weights: [[f64; 2]; 3],
    pub bias: [f64; 3],
}

impl WinModel {
    /// [win, tie, loss] probability against each opponent PR.
    pub fn calc(&self, pr: i64, opponent_prs: &[i64]) -> Vec<[f64; 3]> {
        opponent_prs
            .iter()
            .map(|&opp| self.predict([pr as f64, opp as f64]))
            .collect()
    }

    fn predict(&self, features: [f64; 2]) -> [f64; 3] {
        let x = self.standardize(features);
        let mut logits = [0.0f64; 3];
        for (k, logit) in logits.iter_mut().enumerate() {
            *logit = self.bias[k] + self.weights[k][0] * x[0] + self.weights[k][1] * x[1];
        }
        softmax(logits)
    }

    fn standardize(&self, features: [f64; 2]) -> [f64; 2] {
        [
            (features[0] - self.feature_mean[0]) / self.feature_std[0],
            (features[1] - self.feature_mean[1]) / self.feature_std[1],
        ]
    }

    /// Fit by batch gradient descent on the softmax cross-entropy loss.
    ///
    /// Deterministic: zero-initialized weights, fixed step count.
    pub fn fit(samples: &[(f64, f64, char)]) -> Result<Self> {
        if samples.is_empty() {
            anyhow::bail!("no samples to fit win model");
        }

        let n = samples.len() as f64;
        let mut mean = [0.0f64; 2];
        for (pr, opp, _) in samples {
            mean[0] += pr / n;
            mean[1] += opp / n;
        }
        let mut std = [0.0f64; 2];
        for (pr, opp, _) in samples {
            std[0] += (pr - mean[0]).powi(2) / n;
            std[1] += (opp - mean[1]).powi(2) / n;
        }
        for s in &mut std {
            *s = s.sqrt();
            if *s < 1e-9 {
                *s = 1.0;
            }
        }

        let mut model = WinModel {
            feature_mean: mean,
            feature_std: std,
            weights: [[0.0; 2]; 3],
            bias: [0.0; 3],
        };

        let xs: Vec<[f64; 2]> = samples
            .iter()
            .map(|&(pr, opp, _)| model.standardize([pr, opp]))
            .collect();
        let ys: Vec<usize> = samples
            .iter()
            .map(|&(_, _, class)| class_index(class))
            .collect::<Option<Vec<_>>>()
            .context("unrecognized result class in samples")?;

        let learning_rate = 0.5;
        let epochs = 2000;
        for _ in 0..epochs {
            let mut grad_w = [[0.0f64; 2]; 3];
            let mut grad_b = [0.0f64; 3];
            for (x, &y) in xs.iter().zip(&ys) {
                let mut logits = [0.0f64; 3];
                for (k, logit) in logits.iter_mut().enumerate() {
                    *logit =
                        model.bias[k] + model.weights[k][0] * x[0] + model.weights[k][1] * x[1];
                }
                let probs = softmax(logits);
                for k in 0..3 {
                    let err = probs[k] - if k == y { 1.0 } else { 0.0 };
                    grad_w[k][0] += err * x[0] / n;
                    grad_w[k][1] += err * x[1] / n;
                    grad_b[k] += err / n;
                }
            }
            for k in 0..3 {
                model.weights[k][0] -= learning_rate * grad_w[k][0];
                model.weights[k][1] -= learning_rate * grad_w[k][1];
                model.bias[k] -= learning_rate * grad_b[k];
            }
        }

        Ok(model)
    }

    /// Fraction of samples whose most likely class matches the recorded one.
    pub fn accuracy(&self, samples: &[(f64, f64, char)]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let correct = samples
            .iter()
            .filter(|&&(pr, opp, class)| {
                let probs = self.predict([pr, opp]);
                let predicted = probs
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                Some(predicted) == class_index(class)
            })
            .count();
        correct as f64 / samples.len() as f64
    }
}

fn class_index(class: char) -> Option<usize> {
    CLASSES.iter().position(|&c| c == class.to_ascii_uppercase())
}

fn softmax(logits: [f64; 3]) -> [f64; 3] {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.map(|l| (l - max).exp());
    let sum: f64 = exps.iter().sum();
    exps.map(|e| e / sum)
}

/// Expected ranked points for playing each opponent.
///
/// Win points equal the opponent tier; tie points are 1 for ranked tiers
/// and tier/5 for club tiers; loss points come from the tier table.
pub fn expected_points(
    model: &WinModel,
    pr: i64,
    opponent_prs: &[i64],
    opponent_tiers: &[i64],
) -> Result<Vec<f64>, PointsError> {
    if opponent_prs.len() != opponent_tiers.len() {
        return Err(PointsError::LengthMismatch {
            opponents: opponent_prs.len(),
            tiers: opponent_tiers.len(),
        });
    }
    for &tier in opponent_tiers {
        if loss_points(tier).is_none() {
            return Err(PointsError::InvalidTier(tier));
        }
    }

    let probs = model.calc(pr, opponent_prs);
    Ok(probs
        .iter()
        .zip(opponent_tiers)
        .map(|(wtl, &tier)| {
            let win = tier as f64;
            let tie = if tier < 100 { 1.0 } else { tier as f64 / 5.0 };
            let loss = loss_points(tier).unwrap_or(0.0);
            win * wtl[0] + tie * wtl[1] + loss * wtl[2]
        })
        .collect())
}

fn loss_points(tier: i64) -> Option<f64> {
    TIER_LOSS_POINTS
        .iter()
        .find(|(t, _)| *t == tier)
        .map(|(_, pts)| *pts)
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Stores fitted models as JSON under the model directory, one file per
/// gear state.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ModelStore { dir: dir.into() }
    }

    fn model_path(&self, geared: bool) -> PathBuf {
        let name = if geared {
            "win_prob_geared.json"
        } else {
            "win_prob_ungeared.json"
        };
        self.dir.join(name)
    }

    pub fn load(&self, geared: bool) -> Result<WinModel> {
        let path = self.model_path(geared);
        let contents = fs::read_to_string(&path).with_context(|| {
            format!(
                "no fitted model at {}; run with --fit first",
                path.display()
            )
        })?;
        let model = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse model file {}", path.display()))?;
        Ok(model)
    }

    pub fn save(&self, geared: bool, model: &WinModel) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("failed to create {}", self.dir.display()))?;
        }
        let path = self.model_path(geared);
        let json = serde_json::to_string_pretty(model)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "model saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Results CSV
// ---------------------------------------------------------------------------

/// Parse the ranked results CSV: columns Gear (Y/N), PR, Opponent PR,
/// Result (W/T/L), in any column order, header required.
pub fn load_results(path: &Path) -> Result<Vec<RankedResult>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read ranked results {}", path.display()))?;
    parse_results(&contents)
}

fn parse_results(contents: &str) -> Result<Vec<RankedResult>> {
    let mut lines = contents.lines();
    let header = lines.next().context("ranked results file is empty")?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let col = |name: &str| -> Result<usize> {
        columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .with_context(|| format!("ranked results missing column {:?}", name))
    };
    let gear_col = col("Gear")?;
    let pr_col = col("PR")?;
    let opp_col = col("Opponent PR")?;
    let result_col = col("Result")?;

    let mut results = Vec::new();
    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |idx: usize| -> Result<&str> {
            fields
                .get(idx)
                .copied()
                .with_context(|| format!("line {}: too few fields", lineno + 2))
        };

        let geared = field(gear_col)?.eq_ignore_ascii_case("Y");
        let pr: f64 = field(pr_col)?
            .parse()
            .with_context(|| format!("line {}: bad PR", lineno + 2))?;
        let opponent_pr: f64 = field(opp_col)?
            .parse()
            .with_context(|| format!("line {}: bad opponent PR", lineno + 2))?;
        let result_field = field(result_col)?;
        let result = result_field
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| CLASSES.contains(c))
            .with_context(|| format!("line {}: result must be W, T, or L", lineno + 2))?;

        results.push(RankedResult {
            geared,
            pr,
            opponent_pr,
            result,
        });
    }
    Ok(results)
}

/// Fit both gear states from the results file and persist them.
///
/// Returns (ungeared accuracy, geared accuracy).
pub fn fit_and_store(results_path: &Path, store: &ModelStore) -> Result<(f64, f64)> {
    let results = load_results(results_path)?;

    let mut accuracies = [0.0f64; 2];
    for (i, geared) in [false, true].into_iter().enumerate() {
        let samples: Vec<(f64, f64, char)> = results
            .iter()
            .filter(|r| r.geared == geared)
            .map(|r| (r.pr, r.opponent_pr, r.result))
            .collect();
        let model = WinModel::fit(&samples)
            .with_context(|| format!("fitting {} model", if geared { "geared" } else { "ungeared" }))?;
        accuracies[i] = model.accuracy(&samples);
        store.save(geared, &model)?;
        info!(geared, accuracy = accuracies[i], "win model fitted");
    }
    Ok((accuracies[0], accuracies[1]))
}
