use tui::layout::{Constraint, Layout, Rect, Size};

pub const HEADER_HEIGHT: u16 = 3;
pub const CONTROLS_HEIGHT: u16 = 3;
pub const COLLAPSED_HEIGHT: u16 = 3;
pub const LOGS_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: [Rect; 2],
    /// League, home, away, analyze.
    pub controls: [Rect; 4],
    pub panel: Rect,
    pub tips: Rect,
    pub accumulator: Rect,
    pub logs: Rect,
}

/// Which of the side sections are expanded, plus whether the log pane shows.
#[derive(Copy, Clone, Debug, Default)]
pub struct LayoutFlags {
    pub tips_expanded: bool,
    pub accumulator_expanded: bool,
    pub show_logs: bool,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, LayoutFlags::default())
    }

    pub fn update(&mut self, area: Rect, flags: LayoutFlags) {
        *self = Self::from_rect(area, flags);
    }

    fn from_rect(area: Rect, flags: LayoutFlags) -> Self {
        let logs_height = if flags.show_logs { LOGS_HEIGHT } else { 0 };
        let [header, controls, body, logs] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(CONTROLS_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(logs_height),
        ])
        .areas(area);

        let [panel, side] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(body);
        let [tips, accumulator] = Self::split_side(side, flags);

        LayoutAreas {
            header: Self::split_header(header),
            controls: Self::split_controls(controls),
            panel,
            tips,
            accumulator,
            logs,
        }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(area)
    }

    fn split_controls(area: Rect) -> [Rect; 4] {
        Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(22),
        ])
        .areas(area)
    }

    /// Collapsed sections shrink to their title bar.
    fn split_side(area: Rect, flags: LayoutFlags) -> [Rect; 2] {
        let section = |expanded: bool| {
            if expanded { Constraint::Fill(1) } else { Constraint::Length(COLLAPSED_HEIGHT) }
        };
        let tail = if flags.tips_expanded || flags.accumulator_expanded {
            Constraint::Length(0)
        } else {
            Constraint::Fill(1)
        };
        let [tips, accumulator, _rest] = Layout::vertical([
            section(flags.tips_expanded),
            section(flags.accumulator_expanded),
            tail,
        ])
        .areas(area);
        [tips, accumulator]
    }
}
