use crate::state::controls::{AnalyzeButton, Sections, SelectControl};
use crate::state::store::SelectionStore;
use h2h_api::DailyTip;

// ---------------------------------------------------------------------------
// Keyboard focus
// ---------------------------------------------------------------------------

/// Focusable regions, in Tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    League,
    Home,
    Away,
    Analyze,
    Tips,
    Accumulator,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::League => Focus::Home,
            Focus::Home => Focus::Away,
            Focus::Away => Focus::Analyze,
            Focus::Analyze => Focus::Tips,
            Focus::Tips => Focus::Accumulator,
            Focus::Accumulator => Focus::League,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::League => Focus::Accumulator,
            Focus::Home => Focus::League,
            Focus::Away => Focus::Home,
            Focus::Analyze => Focus::Away,
            Focus::Tips => Focus::Analyze,
            Focus::Accumulator => Focus::Tips,
        }
    }
}

// ---------------------------------------------------------------------------
// Daily tips feed
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TipsState {
    pub tips: Vec<DailyTip>,
    pub cursor: usize,
    pub error: Option<String>,
    /// "HH:MM" of the last successful load.
    pub loaded_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Blocking alert
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Validation,
    Failure,
}

/// A modal message that swallows input until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingAlert {
    pub kind: AlertKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub store: SelectionStore,
    pub league_select: SelectControl,
    pub home_select: SelectControl,
    pub away_select: SelectControl,
    pub analyze: AnalyzeButton,
    pub tips: TipsState,
    pub accumulator_cursor: usize,
    pub sections: Sections,
    pub focus: Focus,
    pub alert: Option<BlockingAlert>,
    pub show_logs: bool,
    pub show_help: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_both_ways() {
        let mut focus = Focus::League;
        for _ in 0..6 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::League);
        assert_eq!(Focus::League.prev(), Focus::Accumulator);
        assert_eq!(Focus::Tips.prev().next(), Focus::Tips);
    }
}
