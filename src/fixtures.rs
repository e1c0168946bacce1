/// Mock fixture data for testing and development
///
/// This module provides consistent, deterministic fixture data that can be used for:
/// 1. Unit tests - ensuring tests have predictable data
/// 2. Development mock mode - running the app with fake data
/// 3. Benchmarks - providing consistent data for performance testing
///
/// Each mock day has three leagues with one match in every interesting state:
/// not started, first half, half time and finished.
use chrono::{Datelike, NaiveDate, TimeZone, Utc};

use crate::types::{
    EventPerson, EventTime, Fixture, FixtureEvent, FixtureStatus, Goals, LeaderGoals, LeaderStatistics, League,
    LeagueStandings, LineupEntry, LineupPlayer, Match, PlayerLeader, Prediction, PredictionPercent,
    PredictionSummary, PredictionWinner, Standing, StandingRecord, StandingsLeague, Statistic, Team, TeamLineup,
    TeamStatistics, Teams,
};

/// (id, name, country)
pub const MOCK_LEAGUES: [(i64, &str, &str); 3] = [
    (39, "Premier League", "England"),
    (140, "La Liga", "Spain"),
    (135, "Serie A", "Italy"),
];

const MOCK_TEAMS: [[(i64, &str); 8]; 3] = [
    [
        (42, "Arsenal"),
        (50, "Manchester City"),
        (40, "Liverpool"),
        (49, "Chelsea"),
        (47, "Tottenham"),
        (33, "Manchester United"),
        (34, "Newcastle"),
        (66, "Aston Villa"),
    ],
    [
        (541, "Real Madrid"),
        (529, "Barcelona"),
        (530, "Atletico Madrid"),
        (548, "Real Sociedad"),
        (533, "Villarreal"),
        (543, "Real Betis"),
        (536, "Sevilla"),
        (531, "Athletic Club"),
    ],
    [
        (505, "Inter"),
        (489, "AC Milan"),
        (496, "Juventus"),
        (492, "Napoli"),
        (497, "AS Roma"),
        (487, "Lazio"),
        (499, "Atalanta"),
        (502, "Fiorentina"),
    ],
];

/// (short, long, elapsed, home goals, away goals, kickoff hour)
const MOCK_STATES: [(&str, &str, Option<u32>, Option<u32>, Option<u32>, u32); 4] = [
    ("FT", "Match Finished", Some(90), Some(2), Some(1), 12),
    ("HT", "Halftime", Some(45), Some(0), Some(0), 14),
    ("1H", "First Half", Some(23), Some(1), Some(0), 15),
    ("NS", "Not Started", None, None, None, 20),
];

/// Deterministic fixture id for a mock match
pub fn mock_fixture_id(date: NaiveDate, league_index: usize, slot: usize) -> i64 {
    date.num_days_from_ce() as i64 * 100 + league_index as i64 * 10 + slot as i64
}

/// Build a single match record
pub fn create_test_match(
    id: i64,
    league_id: i64,
    home_id: i64,
    away_id: i64,
    status_short: &str,
    goals: (u32, u32),
) -> Match {
    Match {
        fixture: Fixture {
            id,
            date: Utc.with_ymd_and_hms(2024, 11, 20, 15, 0, 0).single().unwrap_or_default(),
            status: FixtureStatus {
                long: long_status(status_short).to_string(),
                short: status_short.to_string(),
                elapsed: None,
                extra: None,
            },
        },
        league: League {
            id: league_id,
            name: format!("League {}", league_id),
            country: None,
        },
        teams: Teams {
            home: Team {
                id: home_id,
                name: format!("Team {}", home_id),
            },
            away: Team {
                id: away_id,
                name: format!("Team {}", away_id),
            },
        },
        goals: Goals {
            home: Some(goals.0),
            away: Some(goals.1),
        },
    }
}

fn long_status(short: &str) -> &'static str {
    match short {
        "NS" => "Not Started",
        "1H" => "First Half",
        "HT" => "Halftime",
        "2H" => "Second Half",
        "ET" => "Extra Time",
        "BT" => "Break Time",
        "P" => "Penalty In Progress",
        "FT" => "Match Finished",
        "AET" => "Match Finished After Extra Time",
        "PEN" => "Match Finished After Penalty",
        _ => "Unknown",
    }
}

/// All mock fixtures of a day, grouped by league in league order
pub fn create_mock_day(date: NaiveDate) -> Vec<Match> {
    let mut matches = Vec::new();
    for (league_index, (league_id, league_name, country)) in MOCK_LEAGUES.iter().enumerate() {
        let teams = &MOCK_TEAMS[league_index];
        for (slot, (short, long, elapsed, home_goals, away_goals, hour)) in MOCK_STATES.iter().enumerate() {
            let (home_id, home_name) = teams[slot * 2];
            let (away_id, away_name) = teams[slot * 2 + 1];
            let kickoff = date
                .and_hms_opt(*hour, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive))
                .unwrap_or_default();
            matches.push(Match {
                fixture: Fixture {
                    id: mock_fixture_id(date, league_index, slot),
                    date: kickoff,
                    status: FixtureStatus {
                        long: long.to_string(),
                        short: short.to_string(),
                        elapsed: *elapsed,
                        extra: None,
                    },
                },
                league: League {
                    id: *league_id,
                    name: league_name.to_string(),
                    country: Some(country.to_string()),
                },
                teams: Teams {
                    home: Team {
                        id: home_id,
                        name: home_name.to_string(),
                    },
                    away: Team {
                        id: away_id,
                        name: away_name.to_string(),
                    },
                },
                goals: Goals {
                    home: *home_goals,
                    away: *away_goals,
                },
            });
        }
    }
    matches
}

/// Live subset of a mock day
pub fn create_mock_live(date: NaiveDate) -> Vec<Match> {
    create_mock_day(date)
        .into_iter()
        .filter(|m| m.fixture.status.is_live())
        .collect()
}

/// Two goals, a card and a substitution
pub fn create_mock_events(fixture_id: i64) -> Vec<FixtureEvent> {
    let seed = fixture_id.unsigned_abs() % 7;
    let event = |kind: &str, detail: &str, minute: u32, player: &str, assist: Option<&str>| FixtureEvent {
        kind: kind.to_string(),
        detail: detail.to_string(),
        time: EventTime {
            elapsed: Some(minute),
            extra: None,
        },
        player: EventPerson {
            id: Some(minute as i64 + seed as i64),
            name: Some(player.to_string()),
        },
        assist: EventPerson {
            id: assist.map(|_| minute as i64 + 100),
            name: assist.map(str::to_string),
        },
    };
    vec![
        event("Goal", "Normal Goal", 12 + seed as u32, "Saka", Some("Odegaard")),
        event("Card", "Yellow Card", 30, "Rice", None),
        event("subst", "Substitution 1", 60, "Trossard", Some("Martinelli")),
        event("Goal", "Normal Goal", 71, "Havertz", None),
    ]
}

/// Both sides in a 4-4-2 with a two-man bench
pub fn create_mock_lineups(home: &Team, away: &Team) -> Vec<TeamLineup> {
    let side = |team: &Team| {
        let entry = |number: u32, pos: &str| LineupEntry {
            player: LineupPlayer {
                id: Some(team.id * 100 + number as i64),
                name: format!("{} {}", team.name, number),
                number: Some(number),
                pos: Some(pos.to_string()),
            },
        };
        let positions = ["G", "D", "D", "D", "D", "M", "M", "M", "M", "F", "F"];
        TeamLineup {
            team: team.clone(),
            formation: Some("4-4-2".to_string()),
            start_xi: positions.iter().enumerate().map(|(i, pos)| entry(i as u32 + 1, pos)).collect(),
            substitutes: vec![entry(12, "G"), entry(14, "F")],
            coach: EventPerson {
                id: Some(team.id),
                name: Some(format!("{} Coach", team.name)),
            },
        }
    };
    vec![side(home), side(away)]
}

/// Possession, shots and cards, home side slightly ahead
pub fn create_mock_statistics(home: &Team, away: &Team) -> Vec<TeamStatistics> {
    let stat = |kind: &str, value: serde_json::Value| Statistic {
        kind: kind.to_string(),
        value,
    };
    vec![
        TeamStatistics {
            team: home.clone(),
            statistics: vec![
                stat("Ball Possession", "56%".into()),
                stat("Total Shots", 11.into()),
                stat("Yellow Cards", 1.into()),
                stat("Red Cards", serde_json::Value::Null),
            ],
        },
        TeamStatistics {
            team: away.clone(),
            statistics: vec![
                stat("Ball Possession", "44%".into()),
                stat("Total Shots", 7.into()),
                stat("Yellow Cards", 2.into()),
                stat("Red Cards", serde_json::Value::Null),
            ],
        },
    ]
}

/// Home side tipped to win
pub fn create_mock_prediction(home: &Team) -> Prediction {
    Prediction {
        predictions: PredictionSummary {
            winner: Some(PredictionWinner {
                id: Some(home.id),
                name: Some(home.name.clone()),
                comment: Some("Win or draw".to_string()),
            }),
            win_or_draw: Some(true),
            under_over: Some("-3.5".to_string()),
            advice: Some(format!("Double chance : {} or draw", home.name)),
            percent: PredictionPercent {
                home: Some("50%".to_string()),
                draw: Some("30%".to_string()),
                away: Some("20%".to_string()),
            },
        },
    }
}

fn mock_league_index(league_id: i64) -> Option<usize> {
    MOCK_LEAGUES.iter().position(|(id, ..)| *id == league_id)
}

/// Table of a mock league in team order, empty for unknown leagues
pub fn create_mock_standings(league_id: i64, season: i32) -> Vec<LeagueStandings> {
    let Some(index) = mock_league_index(league_id) else {
        return Vec::new();
    };
    let (_, name, _) = MOCK_LEAGUES[index];
    let table = MOCK_TEAMS[index]
        .iter()
        .enumerate()
        .map(|(i, (id, team))| {
            let rank = i as u32 + 1;
            let (win, draw) = (10 - rank, rank % 3);
            let lose = 12 - win - draw;
            Standing {
                rank,
                team: Team {
                    id: *id,
                    name: team.to_string(),
                },
                points: (win * 3 + draw) as i32,
                goals_diff: 9 - 2 * i as i32,
                group: Some(name.to_string()),
                all: StandingRecord {
                    played: Some(12),
                    win: Some(win),
                    draw: Some(draw),
                    lose: Some(lose),
                },
            }
        })
        .collect();
    vec![LeagueStandings {
        league: StandingsLeague {
            id: league_id,
            name: name.to_string(),
            season: Some(season),
            standings: vec![table],
        },
    }]
}

/// One leader per mock team, ordered by goals (or assists) descending
pub fn create_mock_leaders(league_id: i64, assists: bool) -> Vec<PlayerLeader> {
    let Some(index) = mock_league_index(league_id) else {
        return Vec::new();
    };
    MOCK_TEAMS[index]
        .iter()
        .enumerate()
        .map(|(i, (id, team))| {
            let count = 14 - 2 * i as u32;
            PlayerLeader {
                player: EventPerson {
                    id: Some(id * 100 + 9),
                    name: Some(format!("{} {}", team, if assists { 10 } else { 9 })),
                },
                statistics: vec![LeaderStatistics {
                    team: Team {
                        id: *id,
                        name: team.to_string(),
                    },
                    goals: LeaderGoals {
                        total: Some(if assists { count / 2 } else { count }),
                        assists: Some(if assists { count } else { count / 2 }),
                    },
                }],
            }
        })
        .collect()
}
