pub mod client;
pub mod wire;

use serde::Deserialize;
use wire::{flexible_opt_string, flexible_string};

// ---------------------------------------------------------------------------
// Domain types: the backend's JSON contract, every field tolerant of absence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeagueRef {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
}

/// A team as listed for one league. Ids are only unique within that league.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamRef {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub name: String,
}

/// Head-to-head analysis for a home/away pairing within a league.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatchupAnalysis {
    pub home: Option<TeamInfo>,
    pub away: Option<TeamInfo>,
    pub probabilities: Option<Probabilities>,
    pub goals: Option<GoalsStats>,
    pub corners: Option<CornersStats>,
    pub cards: Option<CardsStats>,
    pub tip: Option<MainTip>,
    pub alerts: Option<Vec<Alert>>,
    pub h2h: Option<H2hHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamInfo {
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub name: Option<String>,
    /// League table position; the backend sends either a number or "-".
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub position: Option<String>,
}

/// Outcome probabilities in percent. Not guaranteed to sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Probabilities {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GoalsStats {
    pub over15: Option<f64>,
    pub over25: Option<f64>,
    pub btts: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CornersStats {
    /// Average corners per match (absolute count, not a percentage).
    pub avg: Option<f64>,
    pub over85: Option<f64>,
    pub over95: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CardsStats {
    pub avg: Option<f64>,
    pub home: Option<f64>,
    pub away: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MainTip {
    pub label: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Alert {
    #[serde(rename = "type", default, deserialize_with = "flexible_opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub text: Option<String>,
}

impl Alert {
    pub fn severity(&self) -> AlertSeverity {
        match self.kind.as_deref() {
            Some("high") => AlertSeverity::High,
            _ => AlertSeverity::Info,
        }
    }
}

/// Only "high" is special; every other alert type is informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertSeverity {
    High,
    #[default]
    Info,
}

impl AlertSeverity {
    pub fn tag(&self) -> &'static str {
        match self {
            AlertSeverity::High => "HIGH",
            AlertSeverity::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct H2hHistory {
    pub matches: Option<Vec<PastMeeting>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PastMeeting {
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub home: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub away: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub score: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub competition: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub market: Option<String>,
}

/// A suggested bet from the daily tips feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTip {
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub league: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub time: Option<String>,
    pub odd: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub match_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_string")]
    pub market: Option<String>,
}

impl DailyTip {
    /// `league-matchId-market`, the identity of a tip inside an accumulator.
    pub fn composite_key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.league.as_deref().unwrap_or_default(),
            self.match_id.as_deref().unwrap_or_default(),
            self.market.as_deref().unwrap_or_default()
        )
    }
}
