use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

use crate::format::{PLACEHOLDER, format_odd};
use crate::state::store::SelectionStore;

pub const REMOVE_CONTROL: &str = "[x]";

#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorRow {
    pub key: String,
    pub title: String,
    pub meta: String,
    pub odd_label: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorView {
    pub rows: Vec<AccumulatorRow>,
    pub count: String,
    pub combined_odd: String,
}

impl AccumulatorView {
    /// Built from the live accumulator on every draw.
    pub fn build(store: &SelectionStore) -> Self {
        let accumulator = store.accumulator();
        let rows = accumulator
            .entries()
            .iter()
            .map(|e| AccumulatorRow {
                key: e.key.clone(),
                title: e.title.clone(),
                meta: format!("{} · {}", e.league, e.time),
                odd_label: format!("Odd: {}", format_odd(e.odd)),
                tag: e.tag.clone(),
            })
            .collect();

        Self {
            rows,
            count: accumulator.len().to_string(),
            combined_odd: store
                .compute_accumulator_odd()
                .map(format_odd)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }

    pub fn summary(&self) -> String {
        format!("Selections: {}   Combined odd: {}", self.count, self.combined_odd)
    }
}

/// Accumulator rows with the cursor row highlighted, summary on the last line.
pub struct AccumulatorList<'a> {
    pub view: &'a AccumulatorView,
    pub cursor: Option<usize>,
}

impl Widget for AccumulatorList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        if self.view.rows.is_empty() {
            lines.push(Line::from(Span::styled(
                "No selections yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (idx, row) in self.view.rows.iter().enumerate() {
            let selected = self.cursor == Some(idx);
            let title_style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(vec![
                Span::styled(REMOVE_CONTROL, Style::default().fg(Color::Red)),
                Span::raw(" "),
                Span::styled(row.title.clone(), title_style),
                Span::styled(format!("  {}", row.tag), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(row.meta.clone(), Style::default().fg(Color::Gray)),
                Span::raw(format!("  {}", row.odd_label)),
            ]));
        }

        let body_height = area.height.saturating_sub(1);
        let cursor_line = self.cursor.map(|c| c as u16 * 2).unwrap_or(0);
        let scroll = (cursor_line + 2).saturating_sub(body_height);
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .render(Rect::new(area.x, area.y, area.width, body_height), buf);

        Line::from(Span::styled(
            self.view.summary(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .render(Rect::new(area.x, area.y + area.height - 1, area.width, 1), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h2h_api::DailyTip;

    fn tip(match_id: &str, odd: Option<f64>) -> DailyTip {
        DailyTip {
            title: Some(format!("Match {match_id}")),
            league: Some("Serie A".into()),
            time: Some("18:30".into()),
            odd,
            tag: None,
            match_id: Some(match_id.into()),
            market: Some("over25".into()),
        }
    }

    #[test]
    fn empty_accumulator_shows_zero_and_placeholder() {
        let view = AccumulatorView::build(&SelectionStore::default());
        assert!(view.rows.is_empty());
        assert_eq!(view.count, "0");
        assert_eq!(view.combined_odd, "-");
    }

    #[test]
    fn rows_follow_insertion_order() {
        let mut store = SelectionStore::default();
        store.toggle_tip(&tip("7", Some(2.0)));
        store.toggle_tip(&tip("3", Some(1.5)));
        store.toggle_tip(&tip("9", Some(3.0)));

        let view = AccumulatorView::build(&store);
        let titles: Vec<_> = view.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Match 7", "Match 3", "Match 9"]);
        assert_eq!(view.rows[0].meta, "Serie A · 18:30");
        assert_eq!(view.rows[1].odd_label, "Odd: 1.50");
        assert_eq!(view.rows[2].tag, "Tip of the Day");
        assert_eq!(view.count, "3");
        assert_eq!(view.combined_odd, "9.00");
    }

    #[test]
    fn combined_odd_tracks_removals() {
        let mut store = SelectionStore::default();
        store.toggle_tip(&tip("1", Some(2.0)));
        store.toggle_tip(&tip("2", Some(4.0)));
        assert_eq!(AccumulatorView::build(&store).combined_odd, "8.00");

        store.remove_from_accumulator("Serie A-2-over25");
        let view = AccumulatorView::build(&store);
        assert_eq!(view.count, "1");
        assert_eq!(view.combined_odd, "2.00");

        store.remove_from_accumulator("Serie A-1-over25");
        assert_eq!(AccumulatorView::build(&store).combined_odd, "-");
    }

    #[test]
    fn missing_odd_renders_as_one() {
        let mut store = SelectionStore::default();
        store.toggle_tip(&tip("1", None));
        let view = AccumulatorView::build(&store);
        assert_eq!(view.rows[0].odd_label, "Odd: 1.00");
        assert_eq!(view.combined_odd, "1.00");
    }

    #[test]
    fn widget_draws_rows_and_summary() {
        let mut store = SelectionStore::default();
        store.toggle_tip(&tip("1", Some(2.0)));
        let view = AccumulatorView::build(&store);

        let area = Rect::new(0, 0, 48, 4);
        let mut buf = Buffer::empty(area);
        AccumulatorList { view: &view, cursor: Some(0) }.render(area, &mut buf);

        let row = |y: u16| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>();
        assert!(row(0).starts_with("[x] Match 1"));
        assert!(row(1).contains("Odd: 2.00"));
        assert!(row(3).starts_with("Selections: 1   Combined odd: 2.00"));
    }
}
