use crate::app::{App, Interaction};
use crate::state::app_state::Focus;
use crate::state::controls::Section;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    if is_quit(&key_event) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    let request = {
        let mut guard = app.lock().await;
        dispatch_key(&mut guard, key_event)
    };

    if let Some(request) = request
        && let Err(e) = network_requests.send(request).await
    {
        error!("Failed to queue network request: {e}");
    }
}

fn is_quit(key_event: &KeyEvent) -> bool {
    matches!(
        (key_event.code, key_event.modifiers),
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL)
    )
}

/// Translate one key press into app changes. Returns the request to send.
pub fn dispatch_key(app: &mut App, key_event: KeyEvent) -> Option<NetworkRequest> {
    // A blocking alert swallows everything but its dismiss keys.
    if app.state.alert.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc | Char(' ')) {
            app.handle(Interaction::DismissAlert);
        }
        return None;
    }

    if app.state.show_help {
        if matches!(key_event.code, KeyCode::Esc | Char('?')) {
            app.toggle_help();
        }
        return None;
    }

    let interaction = match (app.state.focus, key_event.code, key_event.modifiers) {
        (_, KeyCode::Tab, _) => Interaction::FocusNext,
        (_, KeyCode::BackTab, _) => Interaction::FocusPrev,
        (_, Char('k') | KeyCode::Up, _) => Interaction::MoveUp,
        (_, Char('j') | KeyCode::Down, _) => Interaction::MoveDown,

        (_, Char('a'), _) | (Focus::Analyze, KeyCode::Enter | Char(' '), _) => {
            Interaction::AnalyzeClicked
        }
        (_, Char('r'), _) => Interaction::RefreshTeams,
        (_, Char('t'), _) => Interaction::SectionToggled(Section::Tips),
        (_, Char('m'), _) => Interaction::SectionToggled(Section::Accumulator),

        (Focus::Tips, KeyCode::Enter | Char(' '), _) => {
            if !app.state.sections.tips.is_expanded() {
                app.state.sections.tips.expand();
                return None;
            }
            Interaction::TipClicked(app.state.tips.cursor)
        }
        (Focus::Accumulator, KeyCode::Enter | Char(' '), _) => {
            app.state.sections.accumulator.expand();
            return None;
        }
        (Focus::Accumulator, Char('x') | KeyCode::Delete | KeyCode::Backspace, _) => {
            Interaction::RemoveClicked(app.selected_accumulator_key()?)
        }

        (_, Char('"'), _) => {
            app.toggle_show_logs();
            return None;
        }
        (_, Char('?'), _) => {
            app.toggle_help();
            return None;
        }

        _ => return None,
    };

    app.handle(interaction)
}
