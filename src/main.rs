mod app;
mod components;
mod draw;
mod format;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{API_BASE_VAR, AppSettings, LOG_LEVEL_VAR, TIMEOUT_VAR};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use h2h_api::client::MatchupApi;
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, Default)]
struct CliArgs {
    api_base: Option<String>,
}

enum CliOutcome {
    Run(CliArgs),
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let CliOutcome::Run(args) = parse_cli_args(std::env::args().skip(1)) else {
        return Ok(());
    };

    better_panic::install();

    let mut settings = AppSettings::load();
    if let Some(api_base) = args.api_base {
        settings.api_base = api_base;
    }

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let client = MatchupApi::new(&settings.api_base).with_timeout(settings.timeout);
    info!("using backend at {}", client.base_url());

    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Leagues and daily tips load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

fn parse_cli_args(mut args: impl Iterator<Item = String>) -> CliOutcome {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return CliOutcome::Exit;
            }
            "-V" | "--version" => {
                println!("h2htui {}", env!("CARGO_PKG_VERSION"));
                return CliOutcome::Exit;
            }
            "--api-base" => match args.next() {
                Some(url) => parsed.api_base = Some(url),
                None => {
                    eprintln!("--api-base needs a URL\n\n{}", usage_text());
                    std::process::exit(2);
                }
            },
            _ => {
                if let Some(url) = arg.strip_prefix("--api-base=") {
                    parsed.api_base = Some(url.to_string());
                    continue;
                }
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }

    CliOutcome::Run(parsed)
}

fn usage_text() -> String {
    format!(
        "h2htui - head-to-head football analysis in the terminal

Usage:
  h2htui [--api-base <URL>]
  h2htui --help
  h2htui --version

Environment:
  {API_BASE_VAR}       Analysis backend base URL (default http://127.0.0.1:8080)
  {TIMEOUT_VAR}   Per-request timeout in seconds (default: none)
  {LOG_LEVEL_VAR}      Log level for the log pane (error, warn, info, debug, trace)"
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                handle_ui_event(ui_event, &app, &network_requests).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &mut loading).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = app.lock().await.startup_requests();
            for request in requests {
                if let Err(e) = network_requests.send(request).await {
                    error!("Failed to queue startup request: {e}");
                }
            }
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
        }
        UiEvent::Resize => {}
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => *loading = loading_state,
        response => app.lock().await.apply_response(response),
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: runs on quit and from the panic hook, where errors have
/// nowhere to go.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
