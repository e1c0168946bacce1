//! Which live matches matter, and whether polling is worth it at all

use chrono::{DateTime, Duration, Utc};

use crate::store::UserProfile;
use crate::types::Match;

/// Why a live update matters to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Tracked,
    FavoriteTeam,
    FavoriteLeague,
    AllowedLeague,
    OpenMatch,
    Rendered,
}

/// Relevance filter for one poll cycle
pub struct Relevance<'a> {
    pub profile: &'a UserProfile,
    pub allowed_leagues: &'a [i64],
    /// Match shown on the detail page, if any
    pub open_match: Option<i64>,
}

impl Relevance<'_> {
    /// First reason `m` is relevant, `None` if the update can be dropped
    pub fn reason(&self, m: &Match, rendered: bool) -> Option<Reason> {
        let id = m.id();
        if self.profile.is_tracked(id) {
            Some(Reason::Tracked)
        } else if self.profile.is_favorite_team(m.teams.home.id)
            || self.profile.is_favorite_team(m.teams.away.id)
        {
            Some(Reason::FavoriteTeam)
        } else if self.profile.is_favorite_league(m.league.id) {
            Some(Reason::FavoriteLeague)
        } else if self.allowed_leagues.contains(&m.league.id) {
            Some(Reason::AllowedLeague)
        } else if self.open_match == Some(id) {
            Some(Reason::OpenMatch)
        } else if rendered {
            Some(Reason::Rendered)
        } else {
            None
        }
    }

    pub fn is_relevant(&self, m: &Match, rendered: bool) -> bool {
        self.reason(m, rendered).is_some()
    }
}

/// Kickoff and state of a match currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTiming {
    pub fixture_id: i64,
    pub kickoff: DateTime<Utc>,
    pub finished: bool,
}

impl From<&Match> for MatchTiming {
    fn from(m: &Match) -> Self {
        Self {
            fixture_id: m.id(),
            kickoff: m.fixture.date,
            finished: m.fixture.status.is_finished(),
        }
    }
}

/// True if any rendered match kicks off before `now + lookahead` and is not finished
pub fn needs_refresh(rendered: &[MatchTiming], now: DateTime<Utc>, lookahead: Duration) -> bool {
    let horizon = now + lookahead;
    rendered.iter().any(|t| t.kickoff <= horizon && !t.finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::create_test_match;
    use crate::store::Favorite;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, h, m, 0).unwrap()
    }

    // === relevance ===

    #[test]
    fn test_relevance_reasons() {
        let mut profile = UserProfile::default();
        profile.track(1);
        profile.add_favorite_team(Favorite::new(42, "Arsenal"));
        profile.add_favorite_league(Favorite::new(140, "La Liga"));
        let allowed = [135];
        let relevance = Relevance {
            profile: &profile,
            allowed_leagues: &allowed,
            open_match: Some(5),
        };

        let check = |m: &Match, rendered| relevance.reason(m, rendered);
        assert_eq!(check(&create_test_match(1, 1, 2, 3, "1H", (0, 0)), false), Some(Reason::Tracked));
        assert_eq!(check(&create_test_match(2, 1, 9, 42, "1H", (0, 0)), false), Some(Reason::FavoriteTeam));
        assert_eq!(check(&create_test_match(3, 140, 2, 3, "1H", (0, 0)), false), Some(Reason::FavoriteLeague));
        assert_eq!(check(&create_test_match(4, 135, 2, 3, "1H", (0, 0)), false), Some(Reason::AllowedLeague));
        assert_eq!(check(&create_test_match(5, 1, 2, 3, "1H", (0, 0)), false), Some(Reason::OpenMatch));
        assert_eq!(check(&create_test_match(6, 1, 2, 3, "1H", (0, 0)), true), Some(Reason::Rendered));
        assert!(!relevance.is_relevant(&create_test_match(7, 1, 2, 3, "1H", (0, 0)), false));
    }

    // === adaptive refresh ===

    #[test]
    fn test_needs_refresh_for_upcoming_kickoff() {
        let timings = [MatchTiming {
            fixture_id: 1,
            kickoff: at(15, 4),
            finished: false,
        }];
        assert!(needs_refresh(&timings, at(15, 0), Duration::minutes(5)));
        assert!(!needs_refresh(&timings, at(14, 50), Duration::minutes(5)));
        assert!(needs_refresh(&timings, at(14, 50), Duration::minutes(15)));
    }

    #[test]
    fn test_needs_refresh_ignores_finished() {
        let timings = [MatchTiming {
            fixture_id: 1,
            kickoff: at(12, 0),
            finished: true,
        }];
        assert!(!needs_refresh(&timings, at(15, 0), Duration::minutes(5)));
        assert!(!needs_refresh(&[], at(15, 0), Duration::minutes(5)));
    }

    #[test]
    fn test_timing_from_match() {
        let m = create_test_match(8, 1, 2, 3, "AET", (1, 1));
        let timing = MatchTiming::from(&m);
        assert!(timing.finished);
        assert_eq!(timing.fixture_id, 8);
    }
}
