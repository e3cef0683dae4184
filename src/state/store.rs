use h2h_api::{DailyTip, MatchupAnalysis, TeamRef};
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_TIP_TAG: &str = "Tip of the Day";

// ---------------------------------------------------------------------------
// Accumulator ("multiple bet") entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorEntry {
    pub key: String,
    pub title: String,
    pub league: String,
    pub time: String,
    pub odd: f64,
    pub tag: String,
}

impl AccumulatorEntry {
    pub fn from_tip(tip: &DailyTip) -> Self {
        Self {
            key: tip.composite_key(),
            title: tip.title.clone().unwrap_or_default(),
            league: tip.league.clone().unwrap_or_default(),
            time: tip.time.clone().unwrap_or_default(),
            odd: effective_odd(tip.odd),
            tag: tip
                .tag
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TIP_TAG.to_string()),
        }
    }
}

/// Missing, zero and NaN odds all count as 1 so they never move the product.
pub fn effective_odd(odd: Option<f64>) -> f64 {
    match odd {
        Some(o) if o != 0.0 && !o.is_nan() => o,
        _ => 1.0,
    }
}

/// Whether a tip currently sits in the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Absent,
    Present,
}

/// Ordered list of selected tips. Insertion order is display order and no
/// two entries share a key.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    entries: Vec<AccumulatorEntry>,
}

impl Accumulator {
    pub fn entries(&self) -> &[AccumulatorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Absent tips are appended, present ones removed. Returns the new state.
    pub fn toggle(&mut self, tip: &DailyTip) -> Membership {
        let key = tip.composite_key();
        if self.remove(&key) {
            Membership::Absent
        } else {
            self.entries.push(AccumulatorEntry::from_tip(tip));
            Membership::Present
        }
    }

    /// Remove by key. Returns false (and changes nothing) when the key is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    /// Product of all odds, recomputed on every call. `None` when empty.
    pub fn combined_odd(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.entries.iter().map(|e| effective_odd(Some(e.odd))).product())
    }
}

// ---------------------------------------------------------------------------
// Team cache
// ---------------------------------------------------------------------------

/// Team lists keyed by league id.
///
/// Entries live for the whole session: there is no TTL and nothing is evicted.
/// A caller wanting fresh data fetches again and overwrites with `insert`.
#[derive(Debug, Default)]
pub struct TeamCache {
    by_league: HashMap<String, Vec<TeamRef>>,
}

impl TeamCache {
    pub fn get(&self, league_id: &str) -> Option<&[TeamRef]> {
        self.by_league.get(league_id).map(Vec::as_slice)
    }

    pub fn insert(&mut self, league_id: impl Into<String>, teams: Vec<TeamRef>) {
        self.by_league.insert(league_id.into(), teams);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.by_league.len()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchupSelection {
    pub league_id: String,
    pub home_id: String,
    pub away_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    IncompleteSelection,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::IncompleteSelection => {
                write!(f, "Select league, home team and away team.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Selection store
// ---------------------------------------------------------------------------

/// Owns the user's choices, the per-league team cache, the last analysis and
/// the accumulator. Every mutation goes through the methods below.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selected_league: Option<String>,
    selected_home: Option<String>,
    selected_away: Option<String>,
    teams: TeamCache,
    current_analysis: Option<MatchupAnalysis>,
    accumulator: Accumulator,
    /// Bumped on every league change; team responses tagged with an older
    /// value are superseded.
    teams_generation: u64,
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|s| !s.is_empty())
}

impl SelectionStore {
    pub fn selected_league(&self) -> Option<&str> {
        self.selected_league.as_deref()
    }

    #[cfg(test)]
    pub fn selected_home(&self) -> Option<&str> {
        self.selected_home.as_deref()
    }

    #[cfg(test)]
    pub fn selected_away(&self) -> Option<&str> {
        self.selected_away.as_deref()
    }

    pub fn teams(&self) -> &TeamCache {
        &self.teams
    }

    pub fn current_analysis(&self) -> Option<&MatchupAnalysis> {
        self.current_analysis.as_ref()
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Select a league and clear both team choices. Does not fetch anything.
    /// Returns the generation a team fetch for this league must carry.
    pub fn set_league(&mut self, league_id: Option<String>) -> u64 {
        self.selected_league = non_empty(league_id);
        self.selected_home = None;
        self.selected_away = None;
        self.teams_generation += 1;
        self.teams_generation
    }

    pub fn set_home(&mut self, team_id: Option<String>) {
        self.selected_home = non_empty(team_id);
    }

    pub fn set_away(&mut self, team_id: Option<String>) {
        self.selected_away = non_empty(team_id);
    }

    pub fn cache_teams(&mut self, league_id: &str, teams: Vec<TeamRef>) {
        self.teams.insert(league_id, teams);
    }

    pub fn is_current_generation(&self, generation: u64) -> bool {
        generation == self.teams_generation
    }

    pub fn set_analysis(&mut self, analysis: MatchupAnalysis) {
        self.current_analysis = Some(analysis);
    }

    pub fn toggle_tip(&mut self, tip: &DailyTip) -> Membership {
        self.accumulator.toggle(tip)
    }

    pub fn remove_from_accumulator(&mut self, key: &str) -> bool {
        self.accumulator.remove(key)
    }

    pub fn compute_accumulator_odd(&self) -> Option<f64> {
        self.accumulator.combined_odd()
    }

    pub fn matchup_selection(&self) -> Result<MatchupSelection, ValidationError> {
        match (&self.selected_league, &self.selected_home, &self.selected_away) {
            (Some(league), Some(home), Some(away)) => Ok(MatchupSelection {
                league_id: league.clone(),
                home_id: home.clone(),
                away_id: away.clone(),
            }),
            _ => Err(ValidationError::IncompleteSelection),
        }
    }
}
