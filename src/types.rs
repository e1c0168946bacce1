/// Live-match records in the shape served by the football data API
///
/// Every field that the API may omit is `#[serde(default)]` so that partial
/// payloads still deserialize.
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Status codes of a match in progress
pub const LIVE_STATUSES: [&str; 6] = ["1H", "HT", "2H", "ET", "P", "BT"];

/// Status codes of a finished match
pub const FINISHED_STATUSES: [&str; 3] = ["FT", "AET", "PEN"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub fixture: Fixture,
    pub league: League,
    pub teams: Teams,
    #[serde(default)]
    pub goals: Goals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: i64,
    /// Kickoff time
    pub date: DateTime<Utc>,
    pub status: FixtureStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureStatus {
    #[serde(default)]
    pub long: String,
    pub short: String,
    #[serde(default)]
    pub elapsed: Option<u32>,
    #[serde(default)]
    pub extra: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    pub home: Team,
    pub away: Team,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Goals {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl Goals {
    /// Scores with missing values shown as 0
    pub fn pair(&self) -> (u32, u32) {
        (self.home.unwrap_or(0), self.away.unwrap_or(0))
    }

    /// Compact form used in alerts: "2-1"
    pub fn compact(&self) -> String {
        let (h, a) = self.pair();
        format!("{}-{}", h, a)
    }

    /// Scoreboard form: "2 - 1"
    pub fn display(&self) -> String {
        let (h, a) = self.pair();
        format!("{} - {}", h, a)
    }
}

impl FixtureStatus {
    pub fn is_live(&self) -> bool {
        LIVE_STATUSES.contains(&self.short.as_str())
    }

    pub fn is_finished(&self) -> bool {
        FINISHED_STATUSES.contains(&self.short.as_str())
    }

    /// Match clock, e.g. "45'" or "90+3'"
    pub fn clock(&self) -> String {
        let elapsed = self.elapsed.unwrap_or(0);
        match self.extra {
            Some(extra) if extra > 0 => format!("{}+{}'", elapsed, extra),
            _ => format!("{}'", elapsed),
        }
    }

    /// Text shown on cards and the detail page
    pub fn display_text(&self) -> String {
        if !self.is_live() {
            return self.long.clone();
        }
        if self.short == "HT" {
            return "HT".to_string();
        }
        match self.elapsed {
            Some(_) => self.clock(),
            None => "LIVE".to_string(),
        }
    }
}

impl Match {
    pub fn id(&self) -> i64 {
        self.fixture.id
    }

    pub fn involves_team(&self, team_id: i64) -> bool {
        self.teams.home.id == team_id || self.teams.away.id == team_id
    }
}

/// Single timeline event of a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub time: EventTime,
    #[serde(default)]
    pub player: EventPerson,
    #[serde(default)]
    pub assist: EventPerson,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTime {
    pub elapsed: Option<u32>,
    pub extra: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventPerson {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl FixtureEvent {
    pub fn is_goal(&self) -> bool {
        self.kind == "Goal"
    }
}

/// Alert text for the latest goal in `events`, e.g. "Goal by Kane (Assist: Saka)"
pub fn goal_description(events: &[FixtureEvent]) -> Option<String> {
    let last = events.iter().rev().find(|e| e.is_goal())?;
    let scorer = last.player.name.as_deref()?;
    let mut text = format!("Goal by {}", scorer);
    if let Some(assist) = last.assist.name.as_deref().filter(|n| !n.is_empty()) {
        text.push_str(&format!(" (Assist: {})", assist));
    }
    Some(text)
}

/// Starting eleven, bench and coach of one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLineup {
    pub team: Team,
    #[serde(default)]
    pub formation: Option<String>,
    #[serde(rename = "startXI", default)]
    pub start_xi: Vec<LineupEntry>,
    #[serde(default)]
    pub substitutes: Vec<LineupEntry>,
    #[serde(default)]
    pub coach: EventPerson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player: LineupPlayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupPlayer {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: Option<u32>,
    /// G, D, M or F
    #[serde(default)]
    pub pos: Option<String>,
}

/// Match statistics of one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub team: Team,
    #[serde(default)]
    pub statistics: Vec<Statistic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    #[serde(rename = "type")]
    pub kind: String,
    /// Number, percentage string or null
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Statistic {
    /// Value as shown, missing values as 0
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::Null => "0".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predictions: PredictionSummary,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionSummary {
    #[serde(default)]
    pub winner: Option<PredictionWinner>,
    #[serde(default)]
    pub win_or_draw: Option<bool>,
    #[serde(default)]
    pub under_over: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub percent: PredictionPercent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionWinner {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Outcome odds as served, e.g. "45%"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionPercent {
    pub home: Option<String>,
    pub draw: Option<String>,
    pub away: Option<String>,
}

/// `standings` payload: one league with one table per group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStandings {
    pub league: StandingsLeague,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsLeague {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub standings: Vec<Vec<Standing>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: u32,
    pub team: Team,
    #[serde(default)]
    pub points: i32,
    #[serde(rename = "goalsDiff", default)]
    pub goals_diff: i32,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub all: StandingRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StandingRecord {
    #[serde(default)]
    pub played: Option<u32>,
    #[serde(default)]
    pub win: Option<u32>,
    #[serde(default)]
    pub draw: Option<u32>,
    #[serde(default)]
    pub lose: Option<u32>,
}

/// Entry of the top scorers or top assists list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLeader {
    pub player: EventPerson,
    #[serde(default)]
    pub statistics: Vec<LeaderStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderStatistics {
    pub team: Team,
    #[serde(default)]
    pub goals: LeaderGoals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaderGoals {
    pub total: Option<u32>,
    pub assists: Option<u32>,
}

impl PlayerLeader {
    pub fn team_name(&self) -> &str {
        self.statistics.first().map(|s| s.team.name.as_str()).unwrap_or("")
    }

    pub fn goals(&self) -> u32 {
        self.statistics.first().and_then(|s| s.goals.total).unwrap_or(0)
    }

    pub fn assists(&self) -> u32 {
        self.statistics.first().and_then(|s| s.goals.assists).unwrap_or(0)
    }
}

/// Season a date belongs to: seasons start in July
pub fn season_for(date: NaiveDate) -> i32 {
    if date.month() < 7 {
        date.year() - 1
    } else {
        date.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(short: &str, elapsed: Option<u32>, extra: Option<u32>) -> FixtureStatus {
        FixtureStatus {
            long: "Match Finished".to_string(),
            short: short.to_string(),
            elapsed,
            extra,
        }
    }

    #[test]
    fn test_status_classification() {
        for code in LIVE_STATUSES {
            assert!(status(code, None, None).is_live());
        }
        for code in FINISHED_STATUSES {
            let s = status(code, None, None);
            assert!(s.is_finished());
            assert!(!s.is_live());
        }
        assert!(!status("NS", None, None).is_live());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(status("HT", Some(45), None).display_text(), "HT");
        assert_eq!(status("2H", Some(67), None).display_text(), "67'");
        assert_eq!(status("2H", Some(90), Some(3)).display_text(), "90+3'");
        assert_eq!(status("1H", None, None).display_text(), "LIVE");
        assert_eq!(status("FT", Some(90), None).display_text(), "Match Finished");
    }

    #[test]
    fn test_goals_formatting() {
        let goals = Goals {
            home: Some(2),
            away: None,
        };
        assert_eq!(goals.compact(), "2-0");
        assert_eq!(goals.display(), "2 - 0");
    }

    #[test]
    fn test_match_deserializes_api_payload() {
        let json = r#"{
            "fixture": {"id": 1035, "date": "2024-08-17T14:00:00+00:00",
                        "status": {"long": "Second Half", "short": "2H", "elapsed": 71, "extra": null}},
            "league": {"id": 39, "name": "Premier League", "country": "England"},
            "teams": {"home": {"id": 42, "name": "Arsenal", "logo": "x"},
                      "away": {"id": 39, "name": "Wolves"}},
            "goals": {"home": 1, "away": 0}
        }"#;
        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.id(), 1035);
        assert_eq!(m.fixture.status.display_text(), "71'");
        assert!(m.involves_team(39));
        assert_eq!(m.goals.compact(), "1-0");
    }

    #[test]
    fn test_goal_description_uses_last_goal() {
        let events: Vec<FixtureEvent> = serde_json::from_str(
            r#"[
                {"type": "Goal", "detail": "Normal Goal", "player": {"id": 1, "name": "Saka"}, "assist": {"id": null, "name": null}},
                {"type": "Card", "detail": "Yellow Card", "player": {"id": 2, "name": "Rice"}, "assist": {}},
                {"type": "Goal", "detail": "Normal Goal", "player": {"id": 3, "name": "Havertz"}, "assist": {"id": 1, "name": "Saka"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            goal_description(&events).as_deref(),
            Some("Goal by Havertz (Assist: Saka)")
        );
        assert_eq!(goal_description(&events[..2]).as_deref(), Some("Goal by Saka"));
        assert_eq!(goal_description(&[]), None);
    }

    #[test]
    fn test_season_starts_in_july() {
        let date = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        assert_eq!(season_for(date(2025, 6)), 2024);
        assert_eq!(season_for(date(2025, 7)), 2025);
        assert_eq!(season_for(date(2024, 11)), 2024);
    }

    #[test]
    fn test_statistic_values() {
        let stats: Vec<Statistic> = serde_json::from_str(
            r#"[{"type": "Shots on Goal", "value": 5}, {"type": "Ball Possession", "value": "61%"},
                {"type": "Red Cards", "value": null}]"#,
        )
        .unwrap();
        let shown: Vec<String> = stats.iter().map(Statistic::display_value).collect();
        assert_eq!(shown, vec!["5", "61%", "0"]);
    }

    #[test]
    fn test_standings_and_leaders_deserialize_api_payload() {
        let standings: LeagueStandings = serde_json::from_str(
            r#"{"league": {"id": 39, "name": "Premier League", "season": 2024, "standings": [[
                {"rank": 1, "team": {"id": 40, "name": "Liverpool"}, "points": 28, "goalsDiff": 15,
                 "group": "Premier League", "all": {"played": 11, "win": 9, "draw": 1, "lose": 1}}
            ]]}}"#,
        )
        .unwrap();
        let top = &standings.league.standings[0][0];
        assert_eq!((top.rank, top.points, top.goals_diff), (1, 28, 15));
        assert_eq!(top.all.win, Some(9));

        let leader: PlayerLeader = serde_json::from_str(
            r#"{"player": {"id": 1100, "name": "E. Haaland"},
                "statistics": [{"team": {"id": 50, "name": "Manchester City"}, "goals": {"total": 12, "assists": null}}]}"#,
        )
        .unwrap();
        assert_eq!(leader.team_name(), "Manchester City");
        assert_eq!((leader.goals(), leader.assists()), (12, 0));
    }
}
