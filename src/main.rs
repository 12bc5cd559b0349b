//! Dugout CLI
//!
//! Entry point for the community toolkit: environment bootstrap, local
//! CI gates, and the stat calculators behind the bot's slash commands.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use dugout::config::load_config;
use dugout::stats::club::{expected_points_matrix, optimize_assignments};
use dugout::stats::condition::Condition;
use dugout::stats::gi::calc_gi;
use dugout::stats::train::calc_train_probability;
use dugout::stats::winprob::{expected_points, fit_and_store, ModelStore};

/// Dugout -- MLB 9 Innings community toolkit
#[derive(Parser, Debug)]
#[command(
    name = "dugout",
    version,
    about = "MLB 9 Innings community toolkit",
    long_about = "Developer environment bootstrap, local CI gates, and the stat \
                  calculators behind the community bot's slash commands."
)]
struct Cli {
    /// Never prompt; any condition that would ask the operator fails instead
    #[arg(long, global = true)]
    no_input: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap the local development environment
    Setup,
    /// Run the local CI gates (formatting, import order, style, types)
    Ci,
    /// Split a target GI across the 5 base stats
    Gi {
        /// The 5 base stats
        #[arg(num_args = 5, value_name = "STAT")]
        base_stats: Vec<u32>,
        /// GI total to distribute
        #[arg(long)]
        target: u32,
    },
    /// Probability that training to a level satisfies a condition
    TrainProb {
        /// Current training distribution, 5 values
        #[arg(num_args = 5, value_name = "STAT")]
        current: Vec<u32>,
        /// Target training level
        #[arg(long)]
        level: u32,
        /// Condition, e.g. "POW >= 15 and CON + EYE > 20"
        #[arg(long)]
        condition: String,
    },
    /// Win/tie/loss probability and expected points against opponents
    WinProb {
        /// Your team's power ranking
        #[arg(long)]
        pr: i64,
        /// Using gold gear and condition drinks
        #[arg(long)]
        gear: bool,
        /// Opponent power rankings
        #[arg(long, value_delimiter = ',', required = true)]
        opponents: Vec<i64>,
        /// Opponent tiers (win points); omit to show probabilities only
        #[arg(long, value_delimiter = ',')]
        tiers: Vec<i64>,
        /// Refit the models from the ranked results CSV first
        #[arg(long)]
        fit: bool,
    },
    /// Optimal club-battle attack assignments
    Club {
        /// Your club teams' power rankings
        #[arg(long, value_delimiter = ',', required = true)]
        teams: Vec<i64>,
        /// Opponent power rankings, strongest slot first
        #[arg(long, value_delimiter = ',', required = true)]
        opponents: Vec<i64>,
        /// Remaining opponent health, 0 to 1 per opponent (default full)
        #[arg(long, value_delimiter = ',')]
        healths: Vec<f64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let interactive = !cli.no_input;
    let config = load_config(Path::new("."));

    let result = match cli.command {
        Command::Setup => dugout::setup::bootstrap::run_setup(&config, interactive),
        Command::Ci => dugout::ci::run_local_checks(&config, interactive),
        Command::Gi { base_stats, target } => run_gi(&base_stats, target),
        Command::TrainProb {
            current,
            level,
            condition,
        } => run_train_prob(&current, level, &condition),
        Command::WinProb {
            pr,
            gear,
            opponents,
            tiers,
            fit,
        } => run_win_prob(&config, pr, gear, &opponents, &tiers, fit),
        Command::Club {
            teams,
            opponents,
            healths,
        } => run_club(&config, &teams, &opponents, &healths),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("Error: {:#}", err).red());
            ExitCode::FAILURE
        }
    }
}

// ---- Stat Commands ----------------------------------------------------------

const STAT_LABELS: [&str; 5] = ["CON/LOC", "POW/VEL", "EYE/STA", "SPD/FB", "FLD/BRK"];

fn run_gi(base_stats: &[u32], target: u32) -> Result<()> {
    let gi = calc_gi(base_stats, target)?;
    println!("GI distribution for target {}:", target);
    for (label, value) in STAT_LABELS.iter().zip(gi) {
        println!("  {:<8} {}", label, value);
    }
    Ok(())
}

fn run_train_prob(current: &[u32], level: u32, condition: &str) -> Result<()> {
    let parsed = Condition::parse(condition)?;
    let probability = calc_train_probability(current, level, &parsed)?;
    println!(
        "P({}) at level {} = {:.4}%",
        parsed,
        level,
        probability * 100.0
    );
    Ok(())
}

fn run_win_prob(
    config: &dugout::config::ToolkitConfig,
    pr: i64,
    gear: bool,
    opponents: &[i64],
    tiers: &[i64],
    fit: bool,
) -> Result<()> {
    let store = ModelStore::new(PathBuf::from(&config.model_dir));
    if fit {
        let (ungeared, geared) =
            fit_and_store(Path::new(&config.ranked_results_file), &store)?;
        println!(
            "Models fitted: ungeared accuracy {:.1}%, geared accuracy {:.1}%",
            ungeared * 100.0,
            geared * 100.0
        );
    }

    let model = store.load(gear)?;
    let probs = model.calc(pr, opponents);

    println!(
        "PR {} ({} gear) against {} opponent(s):",
        pr,
        if gear { "with" } else { "no" },
        opponents.len()
    );
    for (opp, wtl) in opponents.iter().zip(&probs) {
        println!(
            "  vs {:>5}: W {:5.1}%  T {:5.1}%  L {:5.1}%",
            opp,
            wtl[0] * 100.0,
            wtl[1] * 100.0,
            wtl[2] * 100.0
        );
    }

    if !tiers.is_empty() {
        let points = expected_points(&model, pr, opponents, tiers)?;
        let total: f64 = points.iter().sum();
        println!("Expected points:");
        for (opp, pts) in opponents.iter().zip(&points) {
            println!("  vs {:>5}: {:+.2}", opp, pts);
        }
        println!("  total:    {:+.2}", total);
    }
    Ok(())
}

fn run_club(
    config: &dugout::config::ToolkitConfig,
    teams: &[i64],
    opponents: &[i64],
    healths: &[f64],
) -> Result<()> {
    let store = ModelStore::new(PathBuf::from(&config.model_dir));
    // Club battles are always played geared.
    let model = store.load(true)?;

    let healths = if healths.is_empty() {
        vec![1.0; opponents.len()]
    } else {
        healths.to_vec()
    };

    let matrix = expected_points_matrix(&model, teams, opponents, &healths)?;
    let plan = optimize_assignments(&matrix);

    println!("Club attack plan ({} teams, {} opponents):", teams.len(), opponents.len());
    for (team_idx, assignment) in plan.assignments.iter().enumerate() {
        match assignment {
            Some(opp_idx) => println!(
                "  team PR {:>5} -> opponent slot {} (PR {:>5}), expected {:+.2}",
                teams[team_idx],
                opp_idx + 1,
                opponents[*opp_idx],
                matrix[team_idx][*opp_idx]
            ),
            None => println!("  team PR {:>5} -> hold back", teams[team_idx]),
        }
    }
    println!("Total expected points: {:+.2}", plan.expected_points);
    Ok(())
}
