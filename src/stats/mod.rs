//! Game Statistics
//!
//! The calculators behind the community's slash commands: GI stat
//! distributions, training-outcome probabilities, ranked win
//! probabilities, and club-battle matchup optimization.

pub mod club;
pub mod condition;
pub mod gi;
pub mod models;
pub mod train;
pub mod winprob;
