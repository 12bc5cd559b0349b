//! Game Models
//!
//! Shared representations of players, rosters, and teams as they exist
//! in the game. Serialized as camelCase JSON for interchange with the
//! community's data dumps.

use serde::{Deserialize, Serialize};

/// Eligible fielding positions.
pub const POSITIONS: &[&str] = &["C", "1B", "2B", "SS", "3B", "OF", "DH", "SP", "RP"];

/// Card grades: diamond, gold, silver, bronze, normal.
pub const PLAYER_GRADES: &[&str] = &["D", "G", "S", "B", "N"];

/// Card types.
pub const PLAYER_TYPES: &[&str] = &["Normal", "Sig", "Supreme", "Vintage", "Legend"];

/// A single skill on a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Name of the skill.
    pub r#type: String,
    /// Current skill level.
    pub level: u8,
}

/// A skill slot holding one or more skills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSlot {
    /// Skill level of the slot, maximum 9.
    pub level: u8,
    pub skills: Vec<Skill>,
}

/// A player card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    /// Year the card is from.
    pub year: u16,
    /// MLB team abbreviation.
    pub team: String,
    /// Card grade (e.g. D for diamond, G for gold).
    pub grade: String,
    /// Card type (e.g. Sig, Normal).
    pub r#type: String,
    pub positions: Vec<String>,
    /// Base 5 stats.
    pub base_stats: [u32; 5],
    /// GI level, out of a high of 90 with mentor.
    pub gi: u32,
    /// Upgrade number, out of 20.
    pub upgrade_level: u8,
    /// The 5 training stats.
    pub train: [u32; 5],
    /// Special training level, out of 10.
    pub st_level: u8,
    /// Whether the card is black diamond.
    pub bd: bool,
    /// Final stats in a team diamond lineup.
    pub lineup_stats: [u32; 5],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_skills: Option<SkillSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_skills: Option<SkillSlot>,
}

/// A team's active roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// 5 starting pitchers.
    pub sp: Vec<Player>,
    /// Closer.
    pub cl: Player,
    /// 2 set-up men.
    pub su: Vec<Player>,
    /// 3 middle relievers.
    pub mr: Vec<Player>,
    /// Long reliever.
    pub lr: Player,
    pub c: Player,
    pub b1: Player,
    pub b2: Player,
    pub ss: Player,
    pub b3: Player,
    /// 3 outfielders.
    pub of: Vec<Player>,
    pub dh: Player,
    /// 5 bench players.
    pub bench: Vec<Player>,
}

/// A full in-game team: roster, reserves, and held currencies/tickets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub name: String,
    /// Mentor level, out of 20.
    pub mentor_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silver_nerf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold_nerf: Option<String>,
    pub roster: Roster,
    pub reserves: Vec<Player>,
    pub points: u64,
    pub stars: u64,
    /// Stat amp tickets.
    pub stat_amps: u32,
    /// Black diamond pieces.
    pub bds: u32,
    /// Diamond grade increase tickets.
    pub gis: u32,
    /// GI reset tickets.
    pub girts: u32,
    /// Skill change tickets.
    pub scts: u32,
    /// Premium skill change tickets.
    pub pscts: u32,
    /// Skill select change tickets (blue).
    pub blues: u32,
    /// Skill select change tickets (green).
    pub greens: u32,
}
