//! Alert overlay state and the refresh countdown

use tracing::{debug, warn};

use super::reconciler::{AlertKind, LiveAlert};
use crate::cache::refresh_events_cached;
use crate::data_provider::FootballDataProvider;
use crate::types::goal_description;

/// The single alert currently on screen
#[derive(Debug, Clone)]
pub struct AlertOverlay {
    current: Option<LiveAlert>,
    shown_at_ms: u64,
    duration_ms: u64,
}

impl AlertOverlay {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            current: None,
            shown_at_ms: 0,
            duration_ms,
        }
    }

    pub fn current(&self) -> Option<&LiveAlert> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Replace whatever is showing
    pub fn show(&mut self, alert: LiveAlert, now_ms: u64) {
        debug!("ALERT: show {:?} for {}", alert.kind, alert.fixture_id());
        self.current = Some(alert);
        self.shown_at_ms = now_ms;
    }

    /// Close the alert once its display time is up. Returns true if it closed.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        if self.current.is_some() && now_ms.saturating_sub(self.shown_at_ms) >= self.duration_ms {
            self.current = None;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self) -> Option<LiveAlert> {
        self.current.take()
    }

    /// Swap in a richer description if the alert for `fixture_id` is still up
    pub fn update_description(&mut self, fixture_id: i64, description: String) -> bool {
        match self.current.as_mut() {
            Some(alert) if alert.fixture_id() == fixture_id => {
                alert.description = description;
                true
            }
            _ => false,
        }
    }
}

/// "Goal by X (Assist: Y)" from the latest goal event, if any
///
/// Events are always fetched fresh so the goal that raised the alert is in them.
pub async fn enrich_goal_description(
    provider: &dyn FootballDataProvider,
    alert: &LiveAlert,
) -> Option<String> {
    if alert.kind != AlertKind::Goal {
        return None;
    }
    match refresh_events_cached(provider, alert.fixture_id()).await {
        Ok(events) => goal_description(&events),
        Err(e) => {
            warn!("ALERT: events for {} unavailable: {}", alert.fixture_id(), e);
            None
        }
    }
}

/// Time left until the next scheduled poll
#[derive(Debug, Clone, Copy)]
pub struct RefreshCountdown {
    interval_ms: u64,
    last_poll_ms: u64,
}

impl RefreshCountdown {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            last_poll_ms: now_ms,
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_poll_ms = now_ms;
    }

    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.last_poll_ms);
        self.interval_ms.saturating_sub(elapsed).div_ceil(1000)
    }

    /// Share of the interval still to go, 0..=100
    pub fn percent_remaining(&self, now_ms: u64) -> u16 {
        let elapsed = now_ms.saturating_sub(self.last_poll_ms).min(self.interval_ms);
        (100 - elapsed * 100 / self.interval_ms) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_provider::ProviderError;
    use crate::fixtures::{create_mock_events, create_test_match};
    use crate::cache::fetch_events_cached;
    use crate::types::{EventPerson, FixtureEvent, Match};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct EventsOnly;

    #[async_trait]
    impl FootballDataProvider for EventsOnly {
        async fn live_matches(&self) -> Result<Vec<Match>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fixtures_on(&self, _date: NaiveDate) -> Result<Vec<Match>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fixture_events(&self, fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError> {
            if fixture_id == 7702 {
                return Err(ProviderError::Api("rate limit".to_string()));
            }
            Ok(create_mock_events(fixture_id))
        }
    }

    /// Serves whatever goals have been scored so far
    struct Scoreboard {
        scorers: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl FootballDataProvider for Scoreboard {
        async fn live_matches(&self) -> Result<Vec<Match>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fixtures_on(&self, _date: NaiveDate) -> Result<Vec<Match>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fixture_events(&self, _fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError> {
            let scorers = self.scorers.lock().unwrap();
            Ok(scorers
                .iter()
                .map(|name| FixtureEvent {
                    kind: "Goal".to_string(),
                    detail: "Normal Goal".to_string(),
                    time: Default::default(),
                    player: EventPerson {
                        id: None,
                        name: Some(name.to_string()),
                    },
                    assist: EventPerson::default(),
                })
                .collect())
        }
    }

    // === overlay ===

    #[test]
    fn test_overlay_expires_after_duration() {
        let mut overlay = AlertOverlay::new(10_000);
        overlay.show(LiveAlert::goal(&create_test_match(1, 1, 2, 3, "1H", (1, 0)), false), 1_000);
        assert!(!overlay.expire(10_999));
        assert!(overlay.is_visible());
        assert!(overlay.expire(11_000));
        assert!(!overlay.is_visible());
        assert!(!overlay.expire(20_000));
    }

    #[test]
    fn test_new_alert_replaces_current() {
        let mut overlay = AlertOverlay::new(10_000);
        overlay.show(LiveAlert::goal(&create_test_match(1, 1, 2, 3, "1H", (1, 0)), false), 0);
        overlay.show(LiveAlert::full_time(&create_test_match(2, 1, 2, 3, "FT", (0, 0)), true), 5_000);
        assert_eq!(overlay.current().map(|a| a.fixture_id()), Some(2));
        // Timer restarted with the new alert
        assert!(!overlay.expire(12_000));
        assert_eq!(overlay.dismiss().map(|a| a.kind), Some(AlertKind::FullTime));
        assert!(overlay.current().is_none());
    }

    #[test]
    fn test_description_update_only_for_same_fixture() {
        let mut overlay = AlertOverlay::new(10_000);
        overlay.show(LiveAlert::goal(&create_test_match(1, 1, 2, 3, "1H", (1, 0)), false), 0);
        assert!(!overlay.update_description(2, "Goal by Nobody".to_string()));
        assert!(overlay.update_description(1, "Goal by Saka".to_string()));
        assert_eq!(overlay.current().unwrap().description, "Goal by Saka");
    }

    // === enrichment ===

    #[tokio::test]
    async fn test_enrich_goal_description() {
        let alert = LiveAlert::goal(&create_test_match(7701, 1, 2, 3, "2H", (2, 0)), false);
        let description = enrich_goal_description(&EventsOnly, &alert).await;
        assert_eq!(description.as_deref(), Some("Goal by Havertz"));
    }

    #[tokio::test]
    async fn test_enrich_names_the_new_scorer_when_events_were_cached() {
        let provider = Scoreboard {
            scorers: Mutex::new(vec!["Saka"]),
        };
        // Detail page loaded the events shortly before the goal
        let before = fetch_events_cached(&provider, 7704).await.unwrap();
        assert_eq!(before.len(), 1);

        provider.scorers.lock().unwrap().push("Odegaard");
        let alert = LiveAlert::goal(&create_test_match(7704, 1, 2, 3, "2H", (2, 0)), false);
        let description = enrich_goal_description(&provider, &alert).await;
        assert_eq!(description.as_deref(), Some("Goal by Odegaard"));
    }

    #[tokio::test]
    async fn test_enrich_skips_full_time_and_errors() {
        let full_time = LiveAlert::full_time(&create_test_match(7703, 1, 2, 3, "FT", (2, 0)), false);
        assert!(enrich_goal_description(&EventsOnly, &full_time).await.is_none());

        let failing = LiveAlert::goal(&create_test_match(7702, 1, 2, 3, "2H", (2, 0)), false);
        assert!(enrich_goal_description(&EventsOnly, &failing).await.is_none());
    }

    // === countdown ===

    #[test]
    fn test_countdown() {
        let mut countdown = RefreshCountdown::new(30_000, 0);
        assert_eq!(countdown.percent_remaining(0), 100);
        assert_eq!(countdown.percent_remaining(15_000), 50);
        assert_eq!(countdown.percent_remaining(45_000), 0);
        assert_eq!(countdown.remaining_secs(14_500), 16);
        countdown.reset(30_000);
        assert_eq!(countdown.remaining_secs(30_000), 30);
    }
}
