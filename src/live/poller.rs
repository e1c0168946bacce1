//! Background live-match polling
//!
//! The poller only fetches. Results are sent to the UI loop, which runs the
//! reconciler between key events so view patches never interleave with
//! navigation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::relevance::{needs_refresh, MatchTiming};
use crate::data_provider::FootballDataProvider;
use crate::types::Match;

/// Buffer size for manual refresh triggers
const REFRESH_CHANNEL_BUFFER_SIZE: usize = 10;

/// Buffer size for poll results
const EVENT_CHANNEL_BUFFER_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// Nothing on screen can change soon, no request made
    Skipped,
    Fetched(Vec<Match>),
    /// Fetch failed; the next period retries
    Failed(String),
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub lookahead: chrono::Duration,
}

/// Control side of a running poller
pub struct PollerHandle {
    refresh_tx: mpsc::Sender<()>,
    timings_tx: watch::Sender<Vec<MatchTiming>>,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PollerHandle {
    /// Poll now instead of waiting for the next tick
    pub fn refresh(&self) {
        if self.refresh_tx.try_send(()).is_err() {
            debug!("LIVE: refresh already pending");
        }
    }

    /// Publish the kickoff and state of the matches now on screen
    pub fn set_rendered(&self, timings: Vec<MatchTiming>) {
        self.timings_tx.send_replace(timings);
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.join.await {
            warn!("LIVE: poller task ended abnormally: {}", e);
        }
    }
}

/// Start polling on the current tokio runtime
pub fn spawn(
    provider: Arc<dyn FootballDataProvider>,
    settings: PollSettings,
) -> (PollerHandle, mpsc::Receiver<PollEvent>) {
    let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_CHANNEL_BUFFER_SIZE);
    let (timings_tx, timings_rx) = watch::channel(Vec::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_BUFFER_SIZE);

    let join = tokio::spawn(poll_loop(
        provider,
        settings,
        refresh_rx,
        timings_rx,
        shutdown_rx,
        events_tx,
    ));

    let handle = PollerHandle {
        refresh_tx,
        timings_tx,
        shutdown_tx,
        join,
    };
    (handle, events_rx)
}

/// One cycle: skip if nothing rendered can change, else fetch
pub async fn poll_once(
    provider: &dyn FootballDataProvider,
    rendered: &[MatchTiming],
    lookahead: chrono::Duration,
    forced: bool,
) -> PollEvent {
    if !forced && !needs_refresh(rendered, Utc::now(), lookahead) {
        debug!("LIVE: no rendered match near kickoff or in progress, skipping");
        return PollEvent::Skipped;
    }
    match provider.live_matches().await {
        Ok(matches) => {
            debug!("LIVE: fetched {} live matches", matches.len());
            PollEvent::Fetched(matches)
        }
        Err(e) => {
            warn!("LIVE: fetch failed: {}", e);
            PollEvent::Failed(e.to_string())
        }
    }
}

async fn poll_loop(
    provider: Arc<dyn FootballDataProvider>,
    settings: PollSettings,
    mut refresh_rx: mpsc::Receiver<()>,
    timings_rx: watch::Receiver<Vec<MatchTiming>>,
    mut shutdown_rx: watch::Receiver<bool>,
    events_tx: mpsc::Sender<PollEvent>,
) {
    info!("LIVE: poller started ({:?} period)", settings.interval);
    let mut interval_timer = tokio::time::interval(settings.interval);
    interval_timer.tick().await; // First tick completes immediately

    let mut forced = false;
    loop {
        tokio::select! {
            _ = interval_timer.tick() => {}
            Some(()) = refresh_rx.recv() => {
                forced = true;
            }
            _ = shutdown_rx.changed() => {
                break;
            }
        }
        if *shutdown_rx.borrow() {
            break;
        }

        let rendered = timings_rx.borrow().clone();
        let event = poll_once(provider.as_ref(), &rendered, settings.lookahead, forced).await;
        forced = false;
        if events_tx.send(event).await.is_err() {
            debug!("LIVE: receiver dropped");
            break;
        }
    }
    info!("LIVE: poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_provider::ProviderError;
    use crate::fixtures::create_test_match;
    use crate::types::FixtureEvent;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct LiveOnly {
        calls: AtomicUsize,
        fail: bool,
    }

    impl LiveOnly {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl FootballDataProvider for LiveOnly {
        async fn live_matches(&self) -> Result<Vec<Match>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Api("requests limit reached".to_string()));
            }
            Ok(vec![create_test_match(1, 39, 42, 50, "1H", (1, 0))])
        }

        async fn fixtures_on(&self, _date: NaiveDate) -> Result<Vec<Match>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fixture_events(&self, _fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn in_progress() -> Vec<MatchTiming> {
        vec![MatchTiming {
            fixture_id: 1,
            kickoff: Utc::now() - chrono::Duration::minutes(20),
            finished: false,
        }]
    }

    fn settings() -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(30),
            lookahead: chrono::Duration::minutes(5),
        }
    }

    // === single cycle ===

    #[tokio::test]
    async fn test_poll_once_skips_when_nothing_can_change() {
        let provider = LiveOnly::new(false);
        let event = poll_once(&provider, &[], chrono::Duration::minutes(5), false).await;
        assert_eq!(event, PollEvent::Skipped);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_poll_once_fetches_for_match_in_progress() {
        let provider = LiveOnly::new(false);
        let event = poll_once(&provider, &in_progress(), chrono::Duration::minutes(5), false).await;
        assert!(matches!(event, PollEvent::Fetched(ref m) if m.len() == 1));
    }

    #[tokio::test]
    async fn test_poll_once_forced_ignores_relevance() {
        let provider = LiveOnly::new(false);
        let event = poll_once(&provider, &[], chrono::Duration::minutes(5), true).await;
        assert!(matches!(event, PollEvent::Fetched(_)));
    }

    #[tokio::test]
    async fn test_poll_once_reports_failure() {
        let provider = LiveOnly::new(true);
        let event = poll_once(&provider, &in_progress(), chrono::Duration::minutes(5), false).await;
        assert!(matches!(event, PollEvent::Failed(ref msg) if msg.contains("requests limit")));
    }

    // === loop ===

    #[tokio::test(start_paused = true)]
    async fn test_loop_polls_each_period_and_survives_failures() {
        let provider = Arc::new(LiveOnly::new(true));
        let (handle, mut events) = spawn(provider.clone(), settings());
        handle.set_rendered(in_progress());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(matches!(events.recv().await, Some(PollEvent::Failed(_))));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(matches!(events.recv().await, Some(PollEvent::Failed(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        handle.shutdown().await;
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_polls_immediately() {
        let provider = Arc::new(LiveOnly::new(false));
        let (handle, mut events) = spawn(provider.clone(), settings());

        handle.refresh();
        assert!(matches!(events.recv().await, Some(PollEvent::Fetched(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        handle.shutdown().await;
    }
}
