use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use h2h_api::{DailyTip, LeagueRef, MatchupAnalysis, TeamRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkRequest {
    LoadLeagues,
    /// `generation` is echoed back so superseded responses can be dropped.
    LoadTeams { league_id: String, generation: u64 },
    AnalyzeMatchup { league_id: String, home_id: String, away_id: String },
    LoadDailyTips,
}

/// Each request kind has its own failure variant: the fallback shown to the
/// user depends on which call failed.
#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LeaguesLoaded { leagues: Vec<LeagueRef> },
    LeaguesFailed { message: String },
    TeamsLoaded { league_id: String, generation: u64, teams: Vec<TeamRef> },
    TeamsFailed { league_id: String, generation: u64, message: String },
    AnalysisLoaded { analysis: MatchupAnalysis },
    AnalysisFailed { message: String },
    TipsLoaded { tips: Vec<DailyTip> },
    TipsFailed { message: String },
}

impl NetworkResponse {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            NetworkResponse::LeaguesFailed { .. }
                | NetworkResponse::TeamsFailed { .. }
                | NetworkResponse::AnalysisFailed { .. }
                | NetworkResponse::TipsFailed { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
