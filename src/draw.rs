use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::accumulator::{AccumulatorList, AccumulatorView};
use crate::components::panel::{PanelView, alert_lines, history_lines};
use crate::components::tips::{TipsList, TipsView};
use crate::state::app_state::{AlertKind, Focus};
use crate::state::controls::{Section, SelectControl};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, LayoutFlags};

const HELP_TEXT: &str = "\
Tab / Shift-Tab   move focus
↑ ↓  or  k j      change selection / move cursor
a                 analyze matchup
r                 reload teams for the league
Enter / Space     activate focused item
x / Del           remove accumulator row
t / m             toggle tips / accumulator
\"                 toggle logs
?                 close help
q / Ctrl-C        quit";

/// Redraws the whole screen from current state.
pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(
            f.area(),
            LayoutFlags {
                tips_expanded: app.state.sections.tips.is_expanded(),
                accumulator_expanded: app.state.sections.accumulator.is_expanded(),
                show_logs: app.state.show_logs,
            },
        );

        draw_header(f, layout.header, app, loading);
        draw_controls(f, layout.controls, app);
        draw_panel(f, layout.panel, app);
        draw_tips(f, layout.tips, app);
        draw_accumulator(f, layout.accumulator, app);
        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        if app.state.show_help {
            draw_help(f, f.area());
        }
        if let Some(alert) = app.state.alert.as_ref() {
            draw_alert(f, f.area(), alert.kind, &alert.message);
        }
    });

    if let Err(e) = result {
        log::error!("Failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn focus_color(app: &App, focus: Focus) -> Color {
    if app.state.focus == focus { Color::Yellow } else { Color::DarkGray }
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App, loading: LoadingState) {
    let style = Style::default().fg(Color::White);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Head-to-Head", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", app.settings.api_base), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
            .border_type(BorderType::Rounded),
    )
    .style(style);
    f.render_widget(title, header[0]);

    let spinner = if loading.is_loading || loading.spinner_char == ERROR_CHAR {
        loading.spinner_char.to_string()
    } else {
        " ".to_string()
    };
    let spinner_style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => style,
    };
    let help = Paragraph::new(Line::from(vec![
        Span::styled(spinner, spinner_style),
        Span::raw("  Help: ? "),
    ]))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
            .border_type(BorderType::Rounded),
    )
    .style(style);
    f.render_widget(help, header[1]);
}

fn draw_select(f: &mut Frame, area: Rect, title: &str, control: &SelectControl, color: Color) {
    let block = default_border(color).title(format!(" {title} "));
    let text_style = if control.is_disabled() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let last = control.options().len().saturating_sub(1);
    let prev = if control.selected_index() > 0 { "‹ " } else { "  " };
    let next = if control.selected_index() < last { " ›" } else { "  " };
    let line = Line::from(vec![
        Span::styled(prev, Style::default().fg(Color::DarkGray)),
        Span::styled(control.selected_label().to_string(), text_style),
        Span::styled(next, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_controls(f: &mut Frame, areas: [Rect; 4], app: &App) {
    let state = &app.state;
    draw_select(f, areas[0], "League", &state.league_select, focus_color(app, Focus::League));
    draw_select(f, areas[1], "Home", &state.home_select, focus_color(app, Focus::Home));
    draw_select(f, areas[2], "Away", &state.away_select, focus_color(app, Focus::Away));

    let label_style = if state.analyze.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Span::styled(state.analyze.label(), label_style))
        .alignment(Alignment::Center)
        .block(default_border(focus_color(app, Focus::Analyze)));
    f.render_widget(button, areas[3]);
}

fn draw_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Matchup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(analysis) = app.state.store.current_analysis() else {
        f.render_widget(
            Paragraph::new("Choose a league and both teams, then press a to analyze")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };
    let view = PanelView::build(Some(analysis));

    let [identity, probabilities, tip, stats, bottom] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let side = |s: &crate::components::panel::SideView| {
        vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", s.abbreviation),
                    Style::default().fg(Color::Black).bg(Color::White),
                ),
                Span::styled(format!(" {}", s.name), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(s.position_label.clone(), Style::default().fg(Color::Gray))),
        ]
    };
    let [home_area, vs_area, away_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(4), Constraint::Fill(1)])
            .areas(identity);
    f.render_widget(Paragraph::new(side(&view.home)), home_area);
    f.render_widget(Paragraph::new("vs").alignment(Alignment::Center), vs_area);
    f.render_widget(Paragraph::new(side(&view.away)).alignment(Alignment::Right), away_area);

    f.render_widget(&view.probabilities, probabilities);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                view.tip.label.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(view.tip.text.clone()),
        ]),
        tip,
    );

    let stat_areas: [Rect; 3] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1), Constraint::Fill(1)])
            .areas(stats);
    for (panel, area) in [&view.goals, &view.corners, &view.cards].into_iter().zip(stat_areas) {
        let block = default_border(Color::DarkGray).title(format!(" {} ", panel.title));
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(panel, inner);
    }

    let [alerts_area, history_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(bottom);

    let alerts_block = default_border(Color::DarkGray).title(" Alerts ");
    f.render_widget(
        Paragraph::new(alert_lines(&view.alerts))
            .wrap(Wrap { trim: true })
            .block(alerts_block),
        alerts_area,
    );
    let history_block = default_border(Color::DarkGray).title(" Recent meetings ");
    f.render_widget(
        Paragraph::new(history_lines(&view.history))
            .wrap(Wrap { trim: true })
            .block(history_block),
        history_area,
    );
}

fn draw_tips(f: &mut Frame, area: Rect, app: &App) {
    let section = app.state.sections.get(Section::Tips);
    let loaded = app
        .state
        .tips
        .loaded_at
        .as_deref()
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();
    let block = default_border(focus_color(app, Focus::Tips))
        .title(format!(" {} Tips of the day{loaded} ", section.glyph()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !section.is_expanded() {
        return;
    }
    let view = TipsView::build(
        &app.state.tips.tips,
        app.state.store.accumulator(),
        app.state.tips.error.as_deref(),
    );
    let cursor = (app.state.focus == Focus::Tips).then_some(app.state.tips.cursor);
    f.render_widget(TipsList { view: &view, cursor }, inner);
}

fn draw_accumulator(f: &mut Frame, area: Rect, app: &App) {
    let section = app.state.sections.get(Section::Accumulator);
    let view = AccumulatorView::build(&app.state.store);
    let block = default_border(focus_color(app, Focus::Accumulator)).title(format!(
        " {} Accumulator ({}) · {} ",
        section.glyph(),
        view.count,
        view.combined_odd
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !section.is_expanded() {
        return;
    }
    let cursor = (app.state.focus == Focus::Accumulator).then_some(app.state.accumulator_cursor);
    f.render_widget(AccumulatorList { view: &view, cursor }, inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered(area, 58, 14);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(HELP_TEXT).block(default_border(Color::White).title(" Keys ")),
        popup,
    );
}

fn draw_alert(f: &mut Frame, area: Rect, kind: AlertKind, message: &str) {
    let (title, color) = match kind {
        AlertKind::Validation => (" Check your selection ", Color::Yellow),
        AlertKind::Failure => (" Error ", Color::Red),
    };
    let popup = centered(area, 56, 7);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(message.to_string()),
            Line::default(),
            Line::from(Span::styled("Enter to dismiss", Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(default_border(color).title(title)),
        popup,
    );
}
