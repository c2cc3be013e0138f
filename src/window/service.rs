//! Recent Followers
//!
//! Follows of one followable created strictly after `now - window`, newest first.

use std::sync::Arc;

use chrono::Duration;

use crate::clock::Clock;
use crate::domain::{FollowEvent, Followable};
use crate::store::{FollowEventStore, StoreError};

/// Length of the aggregation window unless configured otherwise
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Window query over a follow store
#[derive(Clone)]
pub struct RecentFollowers {
    store: Arc<dyn FollowEventStore>,
    clock: Arc<dyn Clock>,
}

impl RecentFollowers {
    pub fn new(store: Arc<dyn FollowEventStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Follows inside the trailing `window`. Empty is a valid result.
    pub async fn fetch(
        &self,
        followable: Followable,
        window: Duration,
    ) -> Result<Vec<FollowEvent>, StoreError> {
        let since = self.clock.now() - window;
        let events = self.store.query(followable, since).await?;

        tracing::debug!(
            followable = %followable,
            since = %since,
            count = events.len(),
            "Loaded recent followers"
        );

        Ok(events)
    }

    /// Same as [`fetch`](Self::fetch) with the default 24 hour window
    pub async fn fetch_default(
        &self,
        followable: Followable,
    ) -> Result<Vec<FollowEvent>, StoreError> {
        self.fetch(followable, Duration::hours(DEFAULT_WINDOW_HOURS)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryFollowStore;
    use chrono::{TimeZone, Utc};

    fn setup() -> (Arc<MemoryFollowStore>, Arc<FixedClock>, RecentFollowers) {
        let store = Arc::new(MemoryFollowStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let window = RecentFollowers::new(store.clone(), clock.clone());
        (store, clock, window)
    }

    #[tokio::test]
    async fn test_window_boundary_is_exclusive() {
        let (store, clock, window) = setup();
        let target = Followable::User(1);
        let edge = clock.now() - Duration::hours(24);

        store.follow(10, target, edge).await;
        let inside = store.follow(11, target, edge + Duration::microseconds(1)).await;

        let events = window.fetch_default(target).await.unwrap();
        assert_eq!(events, vec![inside]);
    }

    #[tokio::test]
    async fn test_window_empty_for_unknown_target() {
        let (store, clock, window) = setup();
        store.follow(10, Followable::User(1), clock.now()).await;

        let events = window.fetch_default(Followable::Organization(1)).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_window_moves_with_clock() {
        let (store, clock, window) = setup();
        let target = Followable::Organization(3);
        store.follow(10, target, clock.now()).await;

        assert_eq!(window.fetch_default(target).await.unwrap().len(), 1);

        clock.advance(Duration::hours(24));
        assert!(window.fetch_default(target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_window() {
        let (store, clock, window) = setup();
        let target = Followable::User(2);
        store.follow(10, target, clock.now() - Duration::hours(2)).await;

        assert!(window.fetch(target, Duration::hours(1)).await.unwrap().is_empty());
        assert_eq!(window.fetch(target, Duration::hours(3)).await.unwrap().len(), 1);
    }
}
