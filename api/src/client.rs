use crate::wire::{LeaguesResponse, TeamsResponse, TipsResponse};
use crate::{DailyTip, LeagueRef, MatchupAnalysis, TeamRef};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

const LEAGUES_PATH: &str = "/api/leagues";
const TEAMS_PATH: &str = "/api/teams";
const H2H_PATH: &str = "/api/h2h";
const DAILY_TIPS_PATH: &str = "/api/palpites-dia";

/// Client for the matchup statistics backend.
///
/// Every call is a single GET attempt. Failures are returned to the caller
/// untouched; there is no retry or backoff here.
#[derive(Debug, Clone)]
pub struct MatchupApi {
    client: Client,
    base_url: String,
    /// `None` leaves requests without a deadline.
    timeout: Option<Duration>,
}

impl Default for MatchupApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout).
    Network(reqwest::Error, String),
    /// The server answered outside the 2xx range.
    Request { status: u16, url: String },
    /// The body was not the JSON shape we expected.
    Parse(serde_json::Error, String),
    InvalidUrl(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Request { status, url } => write!(f, "HTTP {status} for {url}"),
            ApiError::Parse(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) => Some(e),
            ApiError::Parse(e, _) => Some(e),
            ApiError::Request { .. } | ApiError::InvalidUrl(_) => None,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl MatchupApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client: Client::builder()
                .user_agent(concat!("h2htui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_leagues(&self) -> ApiResult<Vec<LeagueRef>> {
        let raw: LeaguesResponse = self.get(LEAGUES_PATH, &[]).await?;
        Ok(raw.leagues.unwrap_or_default())
    }

    pub async fn list_teams(&self, league_id: &str) -> ApiResult<Vec<TeamRef>> {
        let raw: TeamsResponse = self.get(TEAMS_PATH, &[("league_id", league_id)]).await?;
        Ok(raw.teams.unwrap_or_default())
    }

    pub async fn analyze_matchup(
        &self,
        league_id: &str,
        home_id: &str,
        away_id: &str,
    ) -> ApiResult<MatchupAnalysis> {
        self.get(
            H2H_PATH,
            &[("league_id", league_id), ("home_id", home_id), ("away_id", away_id)],
        )
        .await
    }

    pub async fn list_daily_tips(&self) -> ApiResult<Vec<DailyTip>> {
        let raw: TipsResponse = self.get(DAILY_TIPS_PATH, &[]).await?;
        Ok(raw.tips.unwrap_or_default())
    }

    /// Join the base URL and a fixed path, percent-encoding query values.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<T> {
        let url = self.endpoint(path, params)?;
        let url_text = url.to_string();

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url_text.clone()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Request { status: status.as_u16(), url: url_text });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url_text.clone()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e, url_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn json_mock(server: &mut mockito::Server, path: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
    }

    #[test]
    fn endpoint_percent_encodes_query_values() {
        let api = MatchupApi::new("http://localhost:9000/");
        let url = api.endpoint(TEAMS_PATH, &[("league_id", "a b&c")]).unwrap();
        assert_eq!(url.path(), "/api/teams");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("league_id".to_string(), "a b&c".to_string())]);
        assert!(!url.as_str().contains("a b&c"));
    }

    #[test]
    fn endpoint_without_params_has_no_query() {
        let api = MatchupApi::new("http://localhost:9000");
        let url = api.endpoint(LEAGUES_PATH, &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/leagues");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let api = MatchupApi::new("not a url");
        let err = api.endpoint(LEAGUES_PATH, &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn list_leagues_reads_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = json_mock(&mut server, LEAGUES_PATH)
            .with_body(r#"{"leagues":[{"id":71,"name":"Brasileirão"},{"id":"epl","name":"Premier League"}]}"#)
            .create_async()
            .await;

        let api = MatchupApi::new(server.url());
        let leagues = api.list_leagues().await.unwrap();

        mock.assert_async().await;
        assert_eq!(leagues.len(), 2);
        assert_eq!(leagues[0], LeagueRef { id: "71".into(), name: "Brasileirão".into() });
        assert_eq!(leagues[1].id, "epl");
    }

    #[tokio::test]
    async fn list_leagues_missing_key_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = json_mock(&mut server, LEAGUES_PATH).with_body("{}").create_async().await;

        let api = MatchupApi::new(server.url());
        assert!(api.list_leagues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_teams_sends_league_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = json_mock(&mut server, TEAMS_PATH)
            .match_query(Matcher::UrlEncoded("league_id".into(), "Série A/B".into()))
            .with_body(r#"{"teams":[{"id":1,"name":"Flamengo"},{"id":2,"name":"Vasco"}]}"#)
            .create_async()
            .await;

        let api = MatchupApi::new(server.url());
        let teams = api.list_teams("Série A/B").await.unwrap();

        mock.assert_async().await;
        assert_eq!(teams.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), ["Flamengo", "Vasco"]);
    }

    #[tokio::test]
    async fn analyze_matchup_sends_all_three_ids() {
        let mut server = mockito::Server::new_async().await;
        let mock = json_mock(&mut server, H2H_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("league_id".into(), "L1".into()),
                Matcher::UrlEncoded("home_id".into(), "H".into()),
                Matcher::UrlEncoded("away_id".into(), "A".into()),
            ]))
            .with_body(
                r#"{
                    "home": {"name": "Home FC", "position": 1},
                    "away": {"name": "Away FC", "position": "-"},
                    "probabilities": {"home": 50, "draw": 20, "away": 40},
                    "goals": {"over15": 80, "over25": 55.5, "btts": 48, "note": "open games"},
                    "h2h": {"matches": [{"date": "2024-05-01", "home": "Home FC", "away": "Away FC", "score": "2-1", "competition": "League"}]}
                }"#,
            )
            .create_async()
            .await;

        let api = MatchupApi::new(server.url());
        let analysis = api.analyze_matchup("L1", "H", "A").await.unwrap();

        mock.assert_async().await;
        assert_eq!(analysis.home.unwrap().name.as_deref(), Some("Home FC"));
        assert_eq!(analysis.probabilities.unwrap().draw, Some(20.0));
        assert_eq!(analysis.goals.unwrap().over25, Some(55.5));
        let history = analysis.h2h.unwrap().matches.unwrap();
        assert_eq!(history[0].score.as_deref(), Some("2-1"));
        assert_eq!(history[0].market, None);
    }

    #[tokio::test]
    async fn list_daily_tips_reads_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = json_mock(&mut server, DAILY_TIPS_PATH)
            .with_body(r#"{"tips":[{"title":"BTTS","league":"EPL","time":"16:00","odd":1.72,"matchId":99,"market":"btts"}]}"#)
            .create_async()
            .await;

        let api = MatchupApi::new(server.url());
        let tips = api.list_daily_tips().await.unwrap();
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0].odd, Some(1.72));
        assert_eq!(tips[0].tag, None);
        assert_eq!(tips[0].composite_key(), "EPL-99-btts");
    }

    #[tokio::test]
    async fn non_success_status_is_a_request_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", H2H_PATH)
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .expect(1)
            .create_async()
            .await;

        let api = MatchupApi::new(server.url());
        let err = api.analyze_matchup("L1", "H", "A").await.unwrap_err();

        // Exactly one attempt: no retry on failure.
        mock.assert_async().await;
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn not_found_is_not_swallowed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", TEAMS_PATH).match_query(Matcher::Any).with_status(404).create_async().await;

        let api = MatchupApi::new(server.url());
        let err = api.list_teams("missing").await.unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = json_mock(&mut server, LEAGUES_PATH)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let api = MatchupApi::new(server.url());
        let err = api.list_leagues().await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_, _)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let api = MatchupApi::new("http://127.0.0.1:1").with_timeout(Some(Duration::from_secs(2)));
        let err = api.list_daily_tips().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_, _)));
    }
}
