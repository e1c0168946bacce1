use crate::data_provider::{FootballDataProvider, ProviderError};
use crate::types::{FixtureEvent, Match};
use cached::proc_macro::cached;
use chrono::NaiveDate;

pub use cached::Cached;

#[cfg(test)]
pub async fn clear_all_caches() {
    EVENTS_CACHE.lock().await.cache_clear();
    DAY_FIXTURES_CACHE.lock().await.cache_clear();
}

/// Events change with every goal, so entries expire before the next live poll
#[cached(
    name = "EVENTS_CACHE",
    type = "cached::TimedSizedCache<i64, Vec<FixtureEvent>>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(50, 20) }",
    convert = r#"{ fixture_id }"#,
    result = true
)]
pub async fn fetch_events_cached(
    client: &dyn FootballDataProvider,
    fixture_id: i64,
) -> Result<Vec<FixtureEvent>, ProviderError> {
    client.fixture_events(fixture_id).await
}

/// Fetch events past the cache and store the fresh copy
///
/// Used when a goal was just seen: a cached list from before the goal would
/// name the previous scorer.
pub async fn refresh_events_cached(
    client: &dyn FootballDataProvider,
    fixture_id: i64,
) -> Result<Vec<FixtureEvent>, ProviderError> {
    let events = client.fixture_events(fixture_id).await?;
    EVENTS_CACHE.lock().await.cache_set(fixture_id, events.clone());
    Ok(events)
}

#[cached(
    name = "DAY_FIXTURES_CACHE",
    type = "cached::TimedSizedCache<NaiveDate, Vec<Match>>",
    create = "{ cached::TimedSizedCache::with_size_and_lifespan(14, 60) }",
    convert = r#"{ date }"#,
    result = true
)]
pub async fn fetch_fixtures_cached(
    client: &dyn FootballDataProvider,
    date: NaiveDate,
) -> Result<Vec<Match>, ProviderError> {
    client.fixtures_on(date).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        event_calls: AtomicUsize,
    }

    #[async_trait]
    impl FootballDataProvider for CountingProvider {
        async fn live_matches(&self) -> Result<Vec<Match>, ProviderError> {
            Ok(Vec::new())
        }

        async fn fixtures_on(&self, date: NaiveDate) -> Result<Vec<Match>, ProviderError> {
            Ok(fixtures::create_mock_day(date))
        }

        async fn fixture_events(&self, fixture_id: i64) -> Result<Vec<FixtureEvent>, ProviderError> {
            self.event_calls.fetch_add(1, Ordering::SeqCst);
            if fixture_id < 0 {
                return Err(ProviderError::Api("unknown fixture".to_string()));
            }
            Ok(fixtures::create_mock_events(fixture_id))
        }
    }

    // Single test so the shared static caches are not raced by parallel tests
    #[tokio::test]
    async fn test_events_cache() {
        clear_all_caches().await;
        let provider = CountingProvider {
            event_calls: AtomicUsize::new(0),
        };

        let first = fetch_events_cached(&provider, 9001).await.unwrap();
        let second = fetch_events_cached(&provider, 9001).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.event_calls.load(Ordering::SeqCst), 1);

        fetch_events_cached(&provider, 9002).await.unwrap();
        assert_eq!(provider.event_calls.load(Ordering::SeqCst), 2);

        // Errors are not cached
        assert!(fetch_events_cached(&provider, -1).await.is_err());
        assert!(fetch_events_cached(&provider, -1).await.is_err());
        assert_eq!(provider.event_calls.load(Ordering::SeqCst), 4);
        assert!(EVENTS_CACHE.lock().await.cache_get(&9001).is_some());
        assert!(EVENTS_CACHE.lock().await.cache_get(&-1).is_none());

        // Refresh always fetches and replaces the cached copy
        let refreshed = refresh_events_cached(&provider, 9001).await.unwrap();
        assert_eq!(provider.event_calls.load(Ordering::SeqCst), 5);
        assert_eq!(EVENTS_CACHE.lock().await.cache_get(&9001), Some(&refreshed));
        assert!(refresh_events_cached(&provider, -1).await.is_err());
    }
}
