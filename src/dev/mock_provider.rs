/// Mock football data provider for development mode
///
/// Serves the fixture day and moves it forward on every live poll: the
/// first-half matches score every other poll and finish after a few, so the
/// live alert path can be exercised without an API key.
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::data_provider::{FootballDataProvider, ProviderError};
use crate::fixtures;
use crate::types::{
    FixtureEvent, LeagueStandings, Match, PlayerLeader, Prediction, TeamLineup, TeamStatistics,
};

/// Polls after which a simulated match ends
const FINISH_AFTER_POLLS: u32 = 6;

pub struct MockProvider {
    date: NaiveDate,
    polls: AtomicU32,
}

impl MockProvider {
    pub fn new(date: NaiveDate) -> Self {
        info!("Creating MockProvider for development mode ({})", date);
        Self {
            date,
            polls: AtomicU32::new(0),
        }
    }

    /// Advance a live match by `polls` cycles
    fn simulate(mut m: Match, polls: u32) -> Match {
        if m.fixture.status.short != "1H" {
            return m;
        }
        let elapsed = m.fixture.status.elapsed.unwrap_or(0) + polls;
        m.fixture.status.elapsed = Some(elapsed);
        m.goals.home = Some(m.goals.home.unwrap_or(0) + polls / 2);
        if polls >= FINISH_AFTER_POLLS {
            m.fixture.status.short = "FT".to_string();
            m.fixture.status.long = "Match Finished".to_string();
        }
        m
    }

    fn day(&self) -> Vec<Match> {
        let polls = self.polls.load(Ordering::SeqCst);
        fixtures::create_mock_day(self.date)
            .into_iter()
            .map(|m| Self::simulate(m, polls))
            .collect()
    }

    fn find(&self, fixture_id: i64) -> Option<Match> {
        self.day().into_iter().find(|m| m.id() == fixture_id)
    }
}

#[async_trait]
impl FootballDataProvider for MockProvider {
    async fn live_matches(&self) -> Result<Vec<Match>, ProviderError> {
        let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        info!("MockProvider: live poll {}", polls);
        Ok(self
            .day()
            .into_iter()
            .filter(|m| m.fixture.status.is_live() || m.fixture.status.is_finished())
            .filter(|m| m.fixture.date.date_naive() == self.date)
            .collect())
    }

    async fn fixtures_on(&self, date: NaiveDate) -> Result<Vec<Match>, ProviderError> {
        info!("MockProvider: fixtures for {}", date);
        if date == self.date {
            return Ok(self.day());
        }
        Ok(fixtures::create_mock_day(date))
    }

    async fn fixture_events(&self, fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError> {
        info!("MockProvider: events for {}", fixture_id);
        Ok(fixtures::create_mock_events(fixture_id))
    }

    async fn fixture_lineups(&self, fixture_id: i64) -> Result<Vec<TeamLineup>, ProviderError> {
        info!("MockProvider: lineups for {}", fixture_id);
        Ok(self
            .find(fixture_id)
            .map(|m| fixtures::create_mock_lineups(&m.teams.home, &m.teams.away))
            .unwrap_or_default())
    }

    async fn fixture_statistics(&self, fixture_id: i64) -> Result<Vec<TeamStatistics>, ProviderError> {
        info!("MockProvider: statistics for {}", fixture_id);
        Ok(self
            .find(fixture_id)
            .filter(|m| m.fixture.status.short != "NS")
            .map(|m| fixtures::create_mock_statistics(&m.teams.home, &m.teams.away))
            .unwrap_or_default())
    }

    async fn predictions(&self, fixture_id: i64) -> Result<Vec<Prediction>, ProviderError> {
        info!("MockProvider: predictions for {}", fixture_id);
        Ok(self
            .find(fixture_id)
            .map(|m| vec![fixtures::create_mock_prediction(&m.teams.home)])
            .unwrap_or_default())
    }

    async fn standings(&self, league_id: i64, season: i32) -> Result<Vec<LeagueStandings>, ProviderError> {
        info!("MockProvider: standings for {} {}", league_id, season);
        Ok(fixtures::create_mock_standings(league_id, season))
    }

    async fn top_scorers(&self, league_id: i64, season: i32) -> Result<Vec<PlayerLeader>, ProviderError> {
        info!("MockProvider: top scorers for {} {}", league_id, season);
        Ok(fixtures::create_mock_leaders(league_id, false))
    }

    async fn top_assists(&self, league_id: i64, season: i32) -> Result<Vec<PlayerLeader>, ProviderError> {
        info!("MockProvider: top assists for {} {}", league_id, season);
        Ok(fixtures::create_mock_leaders(league_id, true))
    }
}
