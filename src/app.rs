use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AlertKind, AppState, BlockingAlert, Focus};
use crate::state::controls::{
    LEAGUES_ERROR_LABEL, LOADING_LABEL, Section, SelectControl, TEAMS_ERROR_LABEL,
};
use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::Local;
use h2h_api::{DailyTip, LeagueRef, MatchupAnalysis, TeamRef};
use log::{debug, error};

pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze matchup. Check the server logs.";

/// Every user action the UI can produce. Key bindings translate into these,
/// and `App::handle` is the only place they are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    LeagueChanged(Option<String>),
    /// Re-fetch the selected league's teams, ignoring the cache.
    RefreshTeams,
    HomeChanged(Option<String>),
    AwayChanged(Option<String>),
    AnalyzeClicked,
    TipClicked(usize),
    RemoveClicked(String),
    SectionToggled(Section),
    DismissAlert,
    FocusNext,
    FocusPrev,
    MoveUp,
    MoveDown,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        let mut state = AppState::new();
        state.league_select = SelectControl::placeholder(LOADING_LABEL).disabled();
        Self { settings, state }
    }

    /// Requests issued once the UI is up.
    pub fn startup_requests(&self) -> [NetworkRequest; 2] {
        [NetworkRequest::LoadLeagues, NetworkRequest::LoadDailyTips]
    }

    // -----------------------------------------------------------------------
    // Interactions
    // -----------------------------------------------------------------------

    /// Apply one interaction. Returns the request to send, if any.
    pub fn handle(&mut self, interaction: Interaction) -> Option<NetworkRequest> {
        match interaction {
            Interaction::LeagueChanged(league_id) => self.change_league(league_id, false),
            Interaction::RefreshTeams => {
                let league_id = self.state.store.selected_league()?.to_string();
                self.change_league(Some(league_id), true)
            }
            Interaction::HomeChanged(team_id) => {
                self.state.home_select.select_value(team_id.as_deref());
                self.state.store.set_home(team_id);
                None
            }
            Interaction::AwayChanged(team_id) => {
                self.state.away_select.select_value(team_id.as_deref());
                self.state.store.set_away(team_id);
                None
            }
            Interaction::AnalyzeClicked => self.analyze(),
            Interaction::TipClicked(index) => {
                if let Some(tip) = self.state.tips.tips.get(index) {
                    let membership = self.state.store.toggle_tip(tip);
                    debug!("tip {} is now {membership:?}", tip.composite_key());
                }
                None
            }
            Interaction::RemoveClicked(key) => {
                if self.state.store.remove_from_accumulator(&key) {
                    let len = self.state.store.accumulator().len();
                    self.state.accumulator_cursor =
                        self.state.accumulator_cursor.min(len.saturating_sub(1));
                }
                None
            }
            Interaction::SectionToggled(section) => {
                self.state.sections.get_mut(section).toggle();
                None
            }
            Interaction::DismissAlert => {
                self.state.alert = None;
                None
            }
            Interaction::FocusNext => {
                self.state.focus = self.state.focus.next();
                None
            }
            Interaction::FocusPrev => {
                self.state.focus = self.state.focus.prev();
                None
            }
            Interaction::MoveUp => self.move_cursor(false),
            Interaction::MoveDown => self.move_cursor(true),
        }
    }

    fn change_league(&mut self, league_id: Option<String>, bypass_cache: bool) -> Option<NetworkRequest> {
        self.state.league_select.select_value(league_id.as_deref());
        let generation = self.state.store.set_league(league_id);

        let Some(league_id) = self.state.store.selected_league().map(str::to_string) else {
            self.state.home_select = SelectControl::default();
            self.state.away_select = SelectControl::default();
            return None;
        };

        if !bypass_cache && let Some(teams) = self.state.store.teams().get(&league_id) {
            debug!("teams for league {league_id} served from cache");
            self.state.home_select = team_control(teams);
            self.state.away_select = team_control(teams);
            return None;
        }

        self.state.home_select = SelectControl::placeholder(LOADING_LABEL).disabled();
        self.state.away_select = SelectControl::placeholder(LOADING_LABEL).disabled();
        Some(NetworkRequest::LoadTeams { league_id, generation })
    }

    fn analyze(&mut self) -> Option<NetworkRequest> {
        if self.state.analyze.is_busy() {
            return None;
        }
        match self.state.store.matchup_selection() {
            Ok(selection) => {
                self.state.analyze.begin();
                Some(NetworkRequest::AnalyzeMatchup {
                    league_id: selection.league_id,
                    home_id: selection.home_id,
                    away_id: selection.away_id,
                })
            }
            Err(e) => {
                self.state.alert =
                    Some(BlockingAlert { kind: AlertKind::Validation, message: e.to_string() });
                None
            }
        }
    }

    /// Up/down on the focused region. Moving a select fires its change.
    fn move_cursor(&mut self, down: bool) -> Option<NetworkRequest> {
        let step = |control: &mut SelectControl| {
            let moved = if down { control.select_next() } else { control.select_prev() };
            moved.then(|| control.value().map(str::to_string))
        };

        match self.state.focus {
            Focus::League => {
                let value = step(&mut self.state.league_select)?;
                self.handle(Interaction::LeagueChanged(value))
            }
            Focus::Home => {
                let value = step(&mut self.state.home_select)?;
                self.handle(Interaction::HomeChanged(value))
            }
            Focus::Away => {
                let value = step(&mut self.state.away_select)?;
                self.handle(Interaction::AwayChanged(value))
            }
            Focus::Analyze => None,
            Focus::Tips => {
                let len = self.state.tips.tips.len();
                self.state.tips.cursor = shift(self.state.tips.cursor, len, down);
                None
            }
            Focus::Accumulator => {
                let len = self.state.store.accumulator().len();
                self.state.accumulator_cursor = shift(self.state.accumulator_cursor, len, down);
                None
            }
        }
    }

    /// Key of the accumulator row under the cursor.
    pub fn selected_accumulator_key(&self) -> Option<String> {
        self.state
            .store
            .accumulator()
            .entries()
            .get(self.state.accumulator_cursor)
            .map(|e| e.key.clone())
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    // -----------------------------------------------------------------------
    // Network response handlers
    // -----------------------------------------------------------------------

    pub fn apply_response(&mut self, response: NetworkResponse) {
        match response {
            // Owned by the UI loop, not by app state.
            NetworkResponse::LoadingStateChanged { .. } => {}
            NetworkResponse::LeaguesLoaded { leagues } => self.on_leagues_loaded(leagues),
            NetworkResponse::LeaguesFailed { message } => self.on_leagues_failed(message),
            NetworkResponse::TeamsLoaded { league_id, generation, teams } => {
                self.on_teams_loaded(league_id, generation, teams)
            }
            NetworkResponse::TeamsFailed { league_id, generation, message } => {
                self.on_teams_failed(league_id, generation, message)
            }
            NetworkResponse::AnalysisLoaded { analysis } => self.on_analysis_loaded(analysis),
            NetworkResponse::AnalysisFailed { message } => self.on_analysis_failed(message),
            NetworkResponse::TipsLoaded { tips } => self.on_tips_loaded(tips),
            NetworkResponse::TipsFailed { message } => self.on_tips_failed(message),
        }
    }

    pub fn on_leagues_loaded(&mut self, leagues: Vec<LeagueRef>) {
        self.state.league_select =
            SelectControl::with_choices(leagues.into_iter().map(|l| (l.id, l.name)));
    }

    pub fn on_leagues_failed(&mut self, message: String) {
        error!("Leagues unavailable: {message}");
        self.state.league_select = SelectControl::placeholder(LEAGUES_ERROR_LABEL);
    }

    pub fn on_teams_loaded(&mut self, league_id: String, generation: u64, teams: Vec<TeamRef>) {
        let current = self.is_current_teams_response(&league_id, generation);
        if current {
            self.state.home_select = team_control(&teams);
            self.state.away_select = team_control(&teams);
        } else {
            debug!("discarding superseded teams for league {league_id} (generation {generation})");
        }
        self.state.store.cache_teams(&league_id, teams);
    }

    pub fn on_teams_failed(&mut self, league_id: String, generation: u64, message: String) {
        error!("Teams unavailable for league {league_id}: {message}");
        if self.is_current_teams_response(&league_id, generation) {
            self.state.home_select = SelectControl::placeholder(TEAMS_ERROR_LABEL);
            self.state.away_select = SelectControl::placeholder(TEAMS_ERROR_LABEL);
        }
    }

    fn is_current_teams_response(&self, league_id: &str, generation: u64) -> bool {
        self.state.store.is_current_generation(generation)
            && self.state.store.selected_league() == Some(league_id)
    }

    pub fn on_analysis_loaded(&mut self, analysis: MatchupAnalysis) {
        self.state.analyze.finish();
        self.state.store.set_analysis(analysis);
    }

    pub fn on_analysis_failed(&mut self, message: String) {
        error!("Matchup analysis failed: {message}");
        self.state.analyze.finish();
        self.state.alert = Some(BlockingAlert {
            kind: AlertKind::Failure,
            message: ANALYSIS_FAILED_MESSAGE.to_string(),
        });
    }

    pub fn on_tips_loaded(&mut self, tips: Vec<DailyTip>) {
        self.state.tips.cursor = self.state.tips.cursor.min(tips.len().saturating_sub(1));
        self.state.tips.tips = tips;
        self.state.tips.error = None;
        self.state.tips.loaded_at = Some(Local::now().format("%H:%M").to_string());
    }

    pub fn on_tips_failed(&mut self, message: String) {
        error!("Daily tips unavailable: {message}");
        self.state.tips.error = Some(message);
    }
}

fn team_control(teams: &[TeamRef]) -> SelectControl {
    SelectControl::with_choices(teams.iter().map(|t| (t.id.clone(), t.name.clone())))
}

fn shift(cursor: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        0
    } else if down {
        (cursor + 1).min(len - 1)
    } else {
        cursor.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::controls::{ANALYZE_BUSY_LABEL, SELECT_PROMPT};

    fn app() -> App {
        App::with_settings(AppSettings::default())
    }

    fn team(id: &str) -> TeamRef {
        TeamRef { id: id.into(), name: format!("Team {id}") }
    }

    fn tip(match_id: &str, odd: f64) -> DailyTip {
        DailyTip {
            title: Some(format!("Match {match_id}")),
            league: Some("EPL".into()),
            time: Some("20:00".into()),
            odd: Some(odd),
            tag: None,
            match_id: Some(match_id.into()),
            market: Some("btts".into()),
        }
    }

    fn loaded_app() -> App {
        let mut app = app();
        app.on_leagues_loaded(vec![
            LeagueRef { id: "L1".into(), name: "One".into() },
            LeagueRef { id: "L2".into(), name: "Two".into() },
        ]);
        app
    }

    #[test]
    fn league_change_disables_team_controls_and_requests() {
        let mut app = loaded_app();
        let request = app.handle(Interaction::LeagueChanged(Some("L1".into())));

        assert_eq!(
            request,
            Some(NetworkRequest::LoadTeams { league_id: "L1".into(), generation: 1 })
        );
        assert!(app.state.home_select.is_disabled());
        assert_eq!(app.state.away_select.selected_label(), LOADING_LABEL);
        assert_eq!(app.state.league_select.selected_label(), "One");
    }

    #[test]
    fn cached_league_fills_controls_without_request() {
        let mut app = loaded_app();
        app.state.store.cache_teams("L2", vec![team("1"), team("2")]);

        let request = app.handle(Interaction::LeagueChanged(Some("L2".into())));
        assert_eq!(request, None);
        assert!(!app.state.home_select.is_disabled());
        assert_eq!(app.state.home_select.options().len(), 3);
    }

    #[test]
    fn refresh_bypasses_cache() {
        let mut app = loaded_app();
        app.state.store.cache_teams("L2", vec![team("1")]);
        app.handle(Interaction::LeagueChanged(Some("L2".into())));

        let request = app.handle(Interaction::RefreshTeams);
        assert!(matches!(request, Some(NetworkRequest::LoadTeams { ref league_id, .. }) if league_id == "L2"));
        assert!(app.state.home_select.is_disabled());
    }

    #[test]
    fn refresh_without_league_is_ignored() {
        assert_eq!(app().handle(Interaction::RefreshTeams), None);
    }

    #[test]
    fn placeholder_league_clears_team_controls() {
        let mut app = loaded_app();
        app.state.store.cache_teams("L1", vec![team("1")]);
        app.handle(Interaction::LeagueChanged(Some("L1".into())));
        app.handle(Interaction::HomeChanged(Some("1".into())));

        assert_eq!(app.handle(Interaction::LeagueChanged(None)), None);
        assert_eq!(app.state.home_select.options().len(), 1);
        assert_eq!(app.state.home_select.selected_label(), SELECT_PROMPT);
        assert_eq!(app.state.store.selected_home(), None);
    }

    #[test]
    fn superseded_teams_are_cached_but_not_shown() {
        let mut app = loaded_app();
        let Some(NetworkRequest::LoadTeams { generation: first, .. }) =
            app.handle(Interaction::LeagueChanged(Some("L1".into())))
        else {
            panic!("expected a team request");
        };
        let Some(NetworkRequest::LoadTeams { generation: second, .. }) =
            app.handle(Interaction::LeagueChanged(Some("L2".into())))
        else {
            panic!("expected a team request");
        };

        app.on_teams_loaded("L2".into(), second, vec![team("20"), team("21")]);
        app.on_teams_loaded("L1".into(), first, vec![team("10")]);

        assert_eq!(app.state.home_select.options()[1].value, "20");
        assert_eq!(app.state.store.teams().get("L1").map(<[TeamRef]>::len), Some(1));
    }

    #[test]
    fn superseded_failure_leaves_controls_alone() {
        let mut app = loaded_app();
        app.handle(Interaction::LeagueChanged(Some("L1".into())));
        app.handle(Interaction::LeagueChanged(Some("L2".into())));
        app.on_teams_failed("L1".into(), 1, "boom".into());
        assert_eq!(app.state.home_select.selected_label(), LOADING_LABEL);
    }

    #[test]
    fn incomplete_selection_raises_validation_alert() {
        let mut app = loaded_app();
        app.handle(Interaction::LeagueChanged(Some("L1".into())));

        assert_eq!(app.handle(Interaction::AnalyzeClicked), None);
        let alert = app.state.alert.clone().unwrap();
        assert_eq!(alert.kind, AlertKind::Validation);
        assert_eq!(alert.message, "Select league, home team and away team.");
        assert!(!app.state.analyze.is_busy());

        app.handle(Interaction::DismissAlert);
        assert!(app.state.alert.is_none());
    }

    #[test]
    fn busy_button_ignores_repeat_clicks() {
        let mut app = app();
        app.state.store.set_league(Some("L1".into()));
        app.state.store.set_home(Some("H".into()));
        app.state.store.set_away(Some("A".into()));

        assert!(app.handle(Interaction::AnalyzeClicked).is_some());
        assert_eq!(app.state.analyze.label(), ANALYZE_BUSY_LABEL);
        assert_eq!(app.handle(Interaction::AnalyzeClicked), None);

        app.on_analysis_loaded(MatchupAnalysis::default());
        assert!(!app.state.analyze.is_busy());
        assert!(app.state.store.current_analysis().is_some());
    }

    #[test]
    fn tip_click_toggles_and_remove_does_not() {
        let mut app = app();
        app.on_tips_loaded(vec![tip("1", 2.0), tip("2", 1.5)]);
        assert!(app.state.tips.loaded_at.is_some());

        app.handle(Interaction::TipClicked(0));
        app.handle(Interaction::TipClicked(1));
        assert_eq!(app.state.store.compute_accumulator_odd(), Some(3.0));

        app.handle(Interaction::RemoveClicked("EPL-1-btts".into()));
        let keys: Vec<_> =
            app.state.store.accumulator().entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, ["EPL-2-btts"]);

        app.handle(Interaction::RemoveClicked("EPL-1-btts".into()));
        assert_eq!(app.state.store.accumulator().len(), 1);

        app.handle(Interaction::TipClicked(9));
        assert_eq!(app.state.store.accumulator().len(), 1);
    }

    #[test]
    fn removing_last_row_pulls_cursor_back() {
        let mut app = app();
        app.on_tips_loaded(vec![tip("1", 2.0), tip("2", 1.5)]);
        app.handle(Interaction::TipClicked(0));
        app.handle(Interaction::TipClicked(1));
        app.state.focus = Focus::Accumulator;
        app.handle(Interaction::MoveDown);
        assert_eq!(app.selected_accumulator_key().as_deref(), Some("EPL-2-btts"));

        app.handle(Interaction::RemoveClicked("EPL-2-btts".into()));
        assert_eq!(app.state.accumulator_cursor, 0);
        assert_eq!(app.selected_accumulator_key().as_deref(), Some("EPL-1-btts"));
    }

    #[test]
    fn sections_toggle_independently() {
        let mut app = app();
        app.handle(Interaction::SectionToggled(Section::Accumulator));
        assert!(app.state.sections.accumulator.is_expanded());
        assert!(!app.state.sections.tips.is_expanded());
    }

    #[test]
    fn moving_the_league_select_fires_a_change() {
        let mut app = loaded_app();
        let request = app.handle(Interaction::MoveDown);
        assert!(matches!(request, Some(NetworkRequest::LoadTeams { ref league_id, .. }) if league_id == "L1"));

        app.state.focus = Focus::Home;
        assert_eq!(app.handle(Interaction::MoveDown), None);
        assert_eq!(app.state.store.selected_home(), None);
    }

    #[test]
    fn league_failure_shows_error_option() {
        let mut app = app();
        assert!(app.state.league_select.is_disabled());
        app.on_leagues_failed("offline".into());
        assert_eq!(app.state.league_select.selected_label(), LEAGUES_ERROR_LABEL);
    }

    #[test]
    fn tips_failure_keeps_previous_list() {
        let mut app = app();
        app.on_tips_loaded(vec![tip("1", 2.0)]);
        app.on_tips_failed("timeout".into());
        assert_eq!(app.state.tips.tips.len(), 1);
        assert_eq!(app.state.tips.error.as_deref(), Some("timeout"));
    }
}
