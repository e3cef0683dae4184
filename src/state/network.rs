use crate::state::messages::{NetworkRequest, NetworkResponse};
use h2h_api::client::MatchupApi;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Requests currently running, and whether any of them failed since the
/// spinner last went idle.
#[derive(Debug, Default)]
struct LoadingTracker {
    in_flight: AtomicUsize,
    failed: AtomicBool,
}

/// Receives requests from the UI loop and runs each one as its own task, so
/// a slow call never holds up the others. Responses arrive in completion
/// order, not request order.
pub struct NetworkWorker {
    client: MatchupApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    tracker: Arc<LoadingTracker>,
}

impl NetworkWorker {
    pub fn new(
        client: MatchupApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, requests, responses, tracker: Arc::default() }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let client = self.client.clone();
            let responses = self.responses.clone();
            let tracker = self.tracker.clone();

            tokio::spawn(async move {
                start_loading_animation(&tracker, &responses).await;

                let response = execute(&client, request).await;
                debug!("network request complete");

                stop_loading_animation(&tracker, &responses, !response.is_failure()).await;

                if let Err(e) = responses.send(response).await {
                    error!("Failed to send network response: {e}");
                }
            });
        }
    }
}

/// Run one request and fold the outcome into a response. Errors surface as
/// the request's own failure variant; the app logs them when applying it.
pub async fn execute(client: &MatchupApi, request: NetworkRequest) -> NetworkResponse {
    match request {
        NetworkRequest::LoadLeagues => {
            debug!("loading leagues");
            match client.list_leagues().await {
                Ok(leagues) => NetworkResponse::LeaguesLoaded { leagues },
                Err(e) => NetworkResponse::LeaguesFailed { message: e.to_string() },
            }
        }
        NetworkRequest::LoadTeams { league_id, generation } => {
            debug!("loading teams for league {league_id} (generation {generation})");
            match client.list_teams(&league_id).await {
                Ok(teams) => NetworkResponse::TeamsLoaded { league_id, generation, teams },
                Err(e) => {
                    NetworkResponse::TeamsFailed { league_id, generation, message: e.to_string() }
                }
            }
        }
        NetworkRequest::AnalyzeMatchup { league_id, home_id, away_id } => {
            debug!("analyzing {home_id} vs {away_id} in league {league_id}");
            match client.analyze_matchup(&league_id, &home_id, &away_id).await {
                Ok(analysis) => NetworkResponse::AnalysisLoaded { analysis },
                Err(e) => NetworkResponse::AnalysisFailed { message: e.to_string() },
            }
        }
        NetworkRequest::LoadDailyTips => {
            debug!("loading daily tips");
            match client.list_daily_tips().await {
                Ok(tips) => NetworkResponse::TipsLoaded { tips },
                Err(e) => NetworkResponse::TipsFailed { message: e.to_string() },
            }
        }
    }
}

async fn start_loading_animation(
    tracker: &Arc<LoadingTracker>,
    responses: &mpsc::Sender<NetworkResponse>,
) {
    // Only the first concurrent request starts the spinner.
    if tracker.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
        return;
    }

    let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
    let _ = responses
        .send(NetworkResponse::LoadingStateChanged { loading_state })
        .await;

    let responses = responses.clone();
    let tracker = tracker.clone();

    tokio::spawn(async move {
        let mut spinner_index = 1;
        let mut interval = tokio::time::interval(Duration::from_millis(33));
        loop {
            interval.tick().await;
            if tracker.in_flight.load(Ordering::SeqCst) == 0 {
                break;
            }
            loading_state.spinner_char = SPINNER_CHARS[spinner_index];
            spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
            let _ = responses
                .send(NetworkResponse::LoadingStateChanged { loading_state })
                .await;
        }
    });
}

/// A failure is remembered until the last running request finishes, so the
/// error mark replaces the spinner only once nothing is left to animate.
async fn stop_loading_animation(
    tracker: &Arc<LoadingTracker>,
    responses: &mpsc::Sender<NetworkResponse>,
    is_ok: bool,
) {
    if !is_ok {
        tracker.failed.store(true, Ordering::SeqCst);
    }
    if tracker.in_flight.fetch_sub(1, Ordering::SeqCst) > 1 {
        return;
    }
    tokio::time::sleep(Duration::from_millis(15)).await;

    let spinner_char = if tracker.failed.swap(false, Ordering::SeqCst) { ERROR_CHAR } else { ' ' };
    let _ = responses
        .send(NetworkResponse::LoadingStateChanged {
            loading_state: LoadingState { is_loading: false, spinner_char },
        })
        .await;
}
