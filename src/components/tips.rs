use h2h_api::DailyTip;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget, Wrap};

use crate::format::{PLACEHOLDER, format_odd};
use crate::state::store::{Accumulator, DEFAULT_TIP_TAG, Membership};

#[derive(Debug, Clone, PartialEq)]
pub struct TipRow {
    pub title: String,
    pub meta: String,
    pub odd_label: String,
    pub tag: String,
    pub membership: Membership,
}

impl TipRow {
    pub fn marker(&self) -> &'static str {
        match self.membership {
            Membership::Present => "[✓]",
            Membership::Absent => "[ ]",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TipsView {
    pub rows: Vec<TipRow>,
    pub error: Option<String>,
}

impl TipsView {
    pub fn build(tips: &[DailyTip], accumulator: &Accumulator, error: Option<&str>) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let rows = tips
            .iter()
            .map(|tip| TipRow {
                title: text(&tip.title),
                meta: format!("{} · {}", text(&tip.league), text(&tip.time)),
                odd_label: format!(
                    "Odd: {}",
                    tip.odd.filter(|o| !o.is_nan()).map(format_odd).unwrap_or_else(|| PLACEHOLDER.to_string())
                ),
                tag: tip
                    .tag
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TIP_TAG.to_string()),
                membership: if accumulator.contains(&tip.composite_key()) {
                    Membership::Present
                } else {
                    Membership::Absent
                },
            })
            .collect();

        Self { rows, error: error.map(str::to_string) }
    }
}

/// Tip rows, two lines each, with the cursor row highlighted.
pub struct TipsList<'a> {
    pub view: &'a TipsView,
    pub cursor: Option<usize>,
}

impl Widget for TipsList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if let Some(error) = self.view.error.as_deref()
            && self.view.rows.is_empty()
        {
            Paragraph::new(format!("Could not load daily tips: {error}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        }

        if self.view.rows.is_empty() {
            Line::from(Span::styled("No tips for today", Style::default().fg(Color::DarkGray)))
                .render(area, buf);
            return;
        }

        let mut lines = Vec::with_capacity(self.view.rows.len() * 2);
        for (idx, row) in self.view.rows.iter().enumerate() {
            let marker_style = match row.membership {
                Membership::Present => Style::default().fg(Color::Green),
                Membership::Absent => Style::default().fg(Color::DarkGray),
            };
            let title_style = if self.cursor == Some(idx) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(vec![
                Span::styled(row.marker(), marker_style),
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

        let cursor_line = self.cursor.map(|c| c as u16 * 2).unwrap_or(0);
        let scroll = (cursor_line + 2).saturating_sub(area.height);
        Paragraph::new(lines).scroll((scroll, 0)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tips() -> Vec<DailyTip> {
        serde_json::from_str(
            r#"[
                {"title":"Arsenal v Spurs","league":"EPL","time":"17:30","odd":1.85,"tag":"Value","matchId":11,"market":"btts"},
                {"title":"Inter v Roma","league":"Serie A","time":"20:45","matchId":"12","market":"home"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn rows_format_odd_and_default_tag() {
        let view = TipsView::build(&tips(), &Accumulator::default(), None);
        assert_eq!(view.rows[0].odd_label, "Odd: 1.85");
        assert_eq!(view.rows[0].tag, "Value");
        assert_eq!(view.rows[0].meta, "EPL · 17:30");
        assert_eq!(view.rows[1].odd_label, "Odd: -");
        assert_eq!(view.rows[1].tag, DEFAULT_TIP_TAG);
    }

    #[test]
    fn membership_follows_accumulator() {
        let tips = tips();
        let mut acc = Accumulator::default();
        acc.toggle(&tips[1]);

        let view = TipsView::build(&tips, &acc, None);
        assert_eq!(view.rows[0].membership, Membership::Absent);
        assert_eq!(view.rows[1].membership, Membership::Present);
        assert_eq!(view.rows[1].marker(), "[✓]");
    }

    #[test]
    fn load_error_renders_inline() {
        let view = TipsView::build(&[], &Accumulator::default(), Some("bad gateway"));
        let area = Rect::new(0, 0, 60, 2);
        let mut buf = Buffer::empty(area);
        TipsList { view: &view, cursor: None }.render(area, &mut buf);

        let first: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(first.starts_with("Could not load daily tips: bad gateway"));
    }

    #[test]
    fn rows_render_marker_and_title() {
        let view = TipsView::build(&tips(), &Accumulator::default(), None);
        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        TipsList { view: &view, cursor: Some(1) }.render(area, &mut buf);

        let row = |y: u16| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>();
        assert!(row(0).starts_with("[ ] Arsenal v Spurs"));
        assert!(row(2).starts_with("[ ] Inter v Roma"));
        assert!(row(3).contains("Odd: -"));
    }
}
