/// Trait for providing football data, abstracting over the HTTP client and mock implementations
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;
use crate::types::{FixtureEvent, LeagueStandings, Match, PlayerLeader, Prediction, TeamLineup, TeamStatistics};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("API error: {0}")]
    Api(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Data-fetch collaborator used by the live poller and the front-end
#[async_trait]
pub trait FootballDataProvider: Send + Sync {
    /// Matches currently in progress
    async fn live_matches(&self) -> Result<Vec<Match>, ProviderError>;

    /// All fixtures on a given day
    async fn fixtures_on(&self, date: NaiveDate) -> Result<Vec<Match>, ProviderError>;

    /// Timeline events (goals, cards, substitutions) of a fixture
    async fn fixture_events(&self, fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError>;

    // Detail and league tabs. Providers without them serve nothing.

    async fn fixture_lineups(&self, _fixture_id: i64) -> Result<Vec<TeamLineup>, ProviderError> {
        Ok(Vec::new())
    }

    async fn fixture_statistics(&self, _fixture_id: i64) -> Result<Vec<TeamStatistics>, ProviderError> {
        Ok(Vec::new())
    }

    async fn predictions(&self, _fixture_id: i64) -> Result<Vec<Prediction>, ProviderError> {
        Ok(Vec::new())
    }

    async fn standings(&self, _league_id: i64, _season: i32) -> Result<Vec<LeagueStandings>, ProviderError> {
        Ok(Vec::new())
    }

    async fn top_scorers(&self, _league_id: i64, _season: i32) -> Result<Vec<PlayerLeader>, ProviderError> {
        Ok(Vec::new())
    }

    async fn top_assists(&self, _league_id: i64, _season: i32) -> Result<Vec<PlayerLeader>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Response envelope: `{"response": [...], "errors": [] | {...}}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
    #[serde(default)]
    errors: serde_json::Value,
}

/// Flatten the `errors` payload into a message, `None` when empty
fn api_errors(errors: &serde_json::Value) -> Option<String> {
    match errors {
        serde_json::Value::Object(map) if !map.is_empty() => Some(
            map.iter()
                .map(|(k, v)| format!("{}: {}", k, v.as_str().unwrap_or(&v.to_string())))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        serde_json::Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ProviderError> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if let Some(message) = api_errors(&envelope.errors) {
        return Err(ProviderError::Api(message));
    }
    Ok(envelope.response)
}

/// HTTP client for the api-football v3 service
pub struct ApiFootballClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiFootballClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Fetching {} {:?}", url, query);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-apisports-key", key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }
        let body = response.text().await?;
        decode(&body)
    }
}

#[async_trait]
impl FootballDataProvider for ApiFootballClient {
    async fn live_matches(&self) -> Result<Vec<Match>, ProviderError> {
        self.get("fixtures", &[("live", "all".to_string())]).await
    }

    async fn fixtures_on(&self, date: NaiveDate) -> Result<Vec<Match>, ProviderError> {
        self.get("fixtures", &[("date", date.format("%Y-%m-%d").to_string())])
            .await
    }

    async fn fixture_events(&self, fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError> {
        self.get("fixtures/events", &[("fixture", fixture_id.to_string())])
            .await
    }

    async fn fixture_lineups(&self, fixture_id: i64) -> Result<Vec<TeamLineup>, ProviderError> {
        self.get("fixtures/lineups", &[("fixture", fixture_id.to_string())])
            .await
    }

    async fn fixture_statistics(&self, fixture_id: i64) -> Result<Vec<TeamStatistics>, ProviderError> {
        self.get("fixtures/statistics", &[("fixture", fixture_id.to_string())])
            .await
    }

    async fn predictions(&self, fixture_id: i64) -> Result<Vec<Prediction>, ProviderError> {
        self.get("predictions", &[("fixture", fixture_id.to_string())]).await
    }

    async fn standings(&self, league_id: i64, season: i32) -> Result<Vec<LeagueStandings>, ProviderError> {
        self.get("standings", &league_query(league_id, season)).await
    }

    async fn top_scorers(&self, league_id: i64, season: i32) -> Result<Vec<PlayerLeader>, ProviderError> {
        self.get("players/topscorers", &league_query(league_id, season)).await
    }

    async fn top_assists(&self, league_id: i64, season: i32) -> Result<Vec<PlayerLeader>, ProviderError> {
        self.get("players/topassists", &league_query(league_id, season)).await
    }
}

fn league_query(league_id: i64, season: i32) -> [(&'static str, String); 2] {
    [("league", league_id.to_string()), ("season", season.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response() {
        let body = r#"{"get": "fixtures/events", "errors": [], "results": 1,
            "response": [{"type": "Goal", "detail": "Penalty", "player": {"id": 9, "name": "Salah"}, "assist": {}}]}"#;
        let events: Vec<FixtureEvent> = decode(body).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_goal());
    }

    #[test]
    fn test_decode_object_errors() {
        let body = r#"{"errors": {"token": "Missing application key."}, "response": []}"#;
        let result: Result<Vec<FixtureEvent>, _> = decode(body);
        match result {
            Err(ProviderError::Api(message)) => assert_eq!(message, "token: Missing application key."),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_object_errors_is_ok() {
        let body = r#"{"errors": {}, "response": []}"#;
        let matches: Vec<Match> = decode(body).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_decode_lineups() {
        let body = r#"{"errors": [], "response": [{"team": {"id": 42, "name": "Arsenal"}, "formation": "4-3-3",
            "startXI": [{"player": {"id": 1, "name": "Raya", "number": 22, "pos": "G", "grid": "1:1"}}],
            "substitutes": [], "coach": {"id": 7, "name": "Arteta", "photo": "x"}}]}"#;
        let lineups: Vec<TeamLineup> = decode(body).unwrap();
        assert_eq!(lineups[0].formation.as_deref(), Some("4-3-3"));
        assert_eq!(lineups[0].start_xi[0].player.number, Some(22));
        assert_eq!(lineups[0].coach.name.as_deref(), Some("Arteta"));
    }

    #[test]
    fn test_decode_invalid_json() {
        let result: Result<Vec<Match>, _> = decode("not json");
        assert!(matches!(result, Err(ProviderError::Decode(_))));
    }
}
