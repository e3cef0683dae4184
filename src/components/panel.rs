use h2h_api::{AlertSeverity, MatchupAnalysis, TeamInfo};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

use crate::format::{
    PLACEHOLDER, abbreviation, bar_string, clamped_bar_width, format_decimal, format_percent,
    scaled_bar_width, split_cells,
};

pub const DEFAULT_TIP_LABEL: &str = "Best Bet";
pub const NOTE_PLACEHOLDER: &str = "–";

/// Scales for absolute quantities drawn as bars.
pub const CORNERS_AVG_BASE: f64 = 14.0;
pub const CARDS_AVG_BASE: f64 = 8.0;
pub const CARDS_TEAM_BASE: f64 = 6.0;

// ---------------------------------------------------------------------------
// View model: pure shaping of a MatchupAnalysis, no terminal involved
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SideView {
    pub name: String,
    pub position_label: String,
    pub abbreviation: String,
}

impl SideView {
    fn build(info: Option<&TeamInfo>) -> Self {
        let name = info.and_then(|t| t.name.clone()).unwrap_or_default();
        let position = info
            .and_then(|t| t.position.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        Self {
            abbreviation: abbreviation(&name),
            name: if name.is_empty() { PLACEHOLDER.to_string() } else { name },
            position_label: format!("Position: {position}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// "1", "X" or "2".
    pub outcome: &'static str,
    /// Probability as the backend sent it; missing reads as zero.
    pub raw: f64,
    /// Share of the bar in percent, normalised across all three outcomes.
    pub width: f64,
}

impl Segment {
    /// Raw probability as shown inside the segment.
    pub fn text(&self) -> String {
        format_percent(Some(self.raw))
    }

    /// Raw probability with its outcome prefix, e.g. `"1: 50%"`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.outcome, self.text())
    }

    pub fn width_label(&self) -> String {
        format!("{:.1}%", self.width)
    }
}

/// Widths are normalised to sum to 100 while labels keep the raw values, so
/// the two disagree whenever the backend's probabilities don't add up to 100.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityView {
    pub segments: [Segment; 3],
}

impl ProbabilityView {
    fn build(analysis: Option<&MatchupAnalysis>) -> Self {
        let probs = analysis.and_then(|a| a.probabilities).unwrap_or_default();
        let value = |v: Option<f64>| v.filter(|x| !x.is_nan()).unwrap_or(0.0);
        let (home, draw, away) = (value(probs.home), value(probs.draw), value(probs.away));
        let total = (home + draw + away).max(1.0);

        let segment = |outcome: &'static str, raw: f64| Segment {
            outcome,
            raw,
            width: raw / total * 100.0,
        };
        Self { segments: [segment("1", home), segment("X", draw), segment("2", away)] }
    }

    pub fn widths(&self) -> [f64; 3] {
        [self.segments[0].width, self.segments[1].width, self.segments[2].width]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TipView {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricView {
    pub label: &'static str,
    pub value_label: String,
    /// Bar width in whole percent.
    pub bar: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatPanelView {
    pub title: &'static str,
    pub metrics: Vec<MetricView>,
    pub note: String,
}

fn note_text(note: Option<&String>) -> String {
    note.filter(|n| !n.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| NOTE_PLACEHOLDER.to_string())
}

fn percent_metric(label: &'static str, value: Option<f64>) -> MetricView {
    MetricView { label, value_label: format_percent(value), bar: clamped_bar_width(value) }
}

fn scaled_metric(label: &'static str, value: Option<f64>, base: f64) -> MetricView {
    MetricView { label, value_label: format_decimal(value, 1), bar: scaled_bar_width(value, base) }
}

impl StatPanelView {
    fn goals(analysis: Option<&MatchupAnalysis>) -> Self {
        let goals = analysis.and_then(|a| a.goals.as_ref());
        Self {
            title: "Goals",
            metrics: vec![
                percent_metric("Over 1.5", goals.and_then(|g| g.over15)),
                percent_metric("Over 2.5", goals.and_then(|g| g.over25)),
                percent_metric("BTTS", goals.and_then(|g| g.btts)),
            ],
            note: note_text(goals.and_then(|g| g.note.as_ref())),
        }
    }

    fn corners(analysis: Option<&MatchupAnalysis>) -> Self {
        let corners = analysis.and_then(|a| a.corners.as_ref());
        Self {
            title: "Corners",
            metrics: vec![
                scaled_metric("Average", corners.and_then(|c| c.avg), CORNERS_AVG_BASE),
                percent_metric("Over 8.5", corners.and_then(|c| c.over85)),
                percent_metric("Over 9.5", corners.and_then(|c| c.over95)),
            ],
            note: note_text(corners.and_then(|c| c.note.as_ref())),
        }
    }

    fn cards(analysis: Option<&MatchupAnalysis>) -> Self {
        let cards = analysis.and_then(|a| a.cards.as_ref());
        Self {
            title: "Cards",
            metrics: vec![
                scaled_metric("Average", cards.and_then(|c| c.avg), CARDS_AVG_BASE),
                scaled_metric("Home", cards.and_then(|c| c.home), CARDS_TEAM_BASE),
                scaled_metric("Away", cards.and_then(|c| c.away), CARDS_TEAM_BASE),
            ],
            note: note_text(cards.and_then(|c| c.note.as_ref())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRow {
    pub severity: AlertSeverity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub summary: String,
    pub meta: String,
}

/// Everything the analysis panel shows, derived from the current analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub home: SideView,
    pub away: SideView,
    pub probabilities: ProbabilityView,
    pub tip: TipView,
    pub goals: StatPanelView,
    pub corners: StatPanelView,
    pub cards: StatPanelView,
    pub alerts: Vec<AlertRow>,
    pub history: Vec<HistoryRow>,
}

impl PanelView {
    /// Total over missing data: absent sections become placeholders.
    pub fn build(analysis: Option<&MatchupAnalysis>) -> Self {
        let tip = analysis.and_then(|a| a.tip.as_ref());
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        let alerts = analysis
            .and_then(|a| a.alerts.as_ref())
            .map(|alerts| {
                alerts
                    .iter()
                    .map(|al| AlertRow { severity: al.severity(), text: text(&al.text) })
                    .collect()
            })
            .unwrap_or_default();

        let history = analysis
            .and_then(|a| a.h2h.as_ref())
            .and_then(|h| h.matches.as_ref())
            .map(|matches| {
                matches
                    .iter()
                    .map(|m| HistoryRow {
                        summary: format!(
                            "{} · {} {} {}",
                            text(&m.date),
                            text(&m.home),
                            text(&m.score),
                            text(&m.away)
                        ),
                        meta: format!("{} · {}", text(&m.competition), text(&m.market)),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            home: SideView::build(analysis.and_then(|a| a.home.as_ref())),
            away: SideView::build(analysis.and_then(|a| a.away.as_ref())),
            probabilities: ProbabilityView::build(analysis),
            tip: TipView {
                label: tip
                    .and_then(|t| t.label.clone())
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| DEFAULT_TIP_LABEL.to_string()),
                text: tip.and_then(|t| t.text.clone()).unwrap_or_default(),
            },
            goals: StatPanelView::goals(analysis),
            corners: StatPanelView::corners(analysis),
            cards: StatPanelView::cards(analysis),
            alerts,
            history,
        }
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

const SEGMENT_COLORS: [Color; 3] = [Color::Green, Color::Gray, Color::Blue];

/// Segmented 1/X/2 bar on the first row, raw labels on the second.
impl Widget for &ProbabilityView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let cells = split_cells(&self.widths(), area.width);
        let mut x = area.x;
        for ((segment, width), color) in self.segments.iter().zip(cells).zip(SEGMENT_COLORS) {
            if width == 0 {
                continue;
            }
            let text = segment.text();
            let len = text.chars().count();
            let content = if len > width as usize {
                " ".repeat(width as usize)
            } else {
                let pad = width as usize - len;
                format!("{}{text}{}", " ".repeat(pad / 2), " ".repeat(pad - pad / 2))
            };
            buf.set_string(x, area.y, content, Style::default().bg(color).fg(Color::Black));
            x += width;
        }

        if area.height > 1 {
            let labels: Vec<Span> = self
                .segments
                .iter()
                .zip(SEGMENT_COLORS)
                .flat_map(|(s, color)| {
                    [Span::styled(s.label(), Style::default().fg(color)), Span::raw("   ")]
                })
                .collect();
            Line::from(labels).render(Rect::new(area.x, area.y + 1, area.width, 1), buf);
        }
    }
}

/// One row per metric: label, bar, value; the note below.
impl Widget for &StatPanelView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        const LABEL_WIDTH: usize = 9;
        const VALUE_WIDTH: usize = 5;
        let bar_width = (area.width as usize).saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 2) as u16;

        let mut lines: Vec<Line> = self
            .metrics
            .iter()
            .map(|m| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<LABEL_WIDTH$}", m.label),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(bar_string(m.bar, bar_width), Style::default().fg(Color::Cyan)),
                    Span::raw(format!(" {:>VALUE_WIDTH$}", m.value_label)),
                ])
            })
            .collect();
        lines.push(Line::from(Span::styled(
            self.note.clone(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines).render(area, buf);
    }
}

pub fn alert_lines(alerts: &[AlertRow]) -> Vec<Line<'static>> {
    alerts
        .iter()
        .map(|a| {
            let tag_style = match a.severity {
                AlertSeverity::High => Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
                AlertSeverity::Info => Style::default().fg(Color::Black).bg(Color::Cyan),
            };
            Line::from(vec![
                Span::styled(format!(" {} ", a.severity.tag()), tag_style),
                Span::raw(format!(" {}", a.text)),
            ])
        })
        .collect()
}

pub fn history_lines(history: &[HistoryRow]) -> Vec<Line<'static>> {
    history
        .iter()
        .map(|h| {
            Line::from(vec![
                Span::raw(h.summary.clone()),
                Span::styled(format!("  {}", h.meta), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect()
}
