//! New Follower Handler
//!
//! Recomputes the follow notification of one followable from the current
//! window. Each call reads fresh state and rewrites the whole aggregate, so
//! concurrent calls for the same target settle on whichever saves last.

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use crate::clock::{Clock, SystemClock};
use crate::domain::{
    AggregatedNotification, IdentityKey, NotificationUpdate, FOLLOW_NOTIFIABLE_TYPE,
};
use crate::error::AppResult;
use crate::store::{
    FollowEventStore, NotificationStore, PgFollowEventStore, PgNotificationStore,
    PgProfileProjector, ProfileProjector,
};
use crate::window::{RecentFollowers, DEFAULT_WINDOW_HOURS};

use super::{aggregate_payload, NewFollowerCommand};

/// Handler for follow aggregation
#[derive(Clone)]
pub struct NewFollowerHandler {
    follows: Arc<dyn FollowEventStore>,
    notifications: Arc<dyn NotificationStore>,
    profiles: Arc<dyn ProfileProjector>,
    clock: Arc<dyn Clock>,
    recent: RecentFollowers,
    window: Duration,
}

impl NewFollowerHandler {
    pub fn new(
        follows: Arc<dyn FollowEventStore>,
        notifications: Arc<dyn NotificationStore>,
        profiles: Arc<dyn ProfileProjector>,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            recent: RecentFollowers::new(follows.clone(), clock.clone()),
            follows,
            notifications,
            profiles,
            clock,
            window: Duration::hours(DEFAULT_WINDOW_HOURS),
        }
    }

    /// Handler over the PostgreSQL stores
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgFollowEventStore::new(pool.clone())),
            Arc::new(PgNotificationStore::new(pool.clone())),
            Arc::new(PgProfileProjector::new(pool)),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.recent = RecentFollowers::new(self.follows.clone(), clock.clone());
        self.clock = clock;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Aggregate for `(followable_type, followable_id)` triggered by `follower_id`.
    ///
    /// Returns the saved notification, or `None` when the window is empty and
    /// any existing notification has been deleted.
    pub async fn apply(
        &self,
        followable_id: i64,
        followable_type: &str,
        follower_id: i64,
        mark_read: bool,
    ) -> AppResult<Option<AggregatedNotification>> {
        let command = NewFollowerCommand::new(followable_id, followable_type, follower_id)
            .with_read(mark_read);
        self.execute(command).await
    }

    /// Execute the aggregation command
    pub async fn execute(
        &self,
        command: NewFollowerCommand,
    ) -> AppResult<Option<AggregatedNotification>> {
        // Reject unknown target types before touching any store
        let target = command.followable()?;
        let key = IdentityKey::follow(target);
        let follower_id = command.follower_id();

        let events = self.recent.fetch(target, self.window).await?;

        if events.is_empty() {
            if let Some(existing) = self.notifications.find_by_identity_key(&key).await? {
                self.notifications.delete(&existing).await?;
                tracing::info!(
                    notification_id = existing.id,
                    "Retracted follow notification for {}",
                    key
                );
            }
            return Ok(None);
        }

        // Resolve every profile before writing so a lookup failure leaves the row untouched
        let payload = aggregate_payload(self.profiles.as_ref(), follower_id, &events).await?;

        let notifiable_id = events
            .iter()
            .find(|e| e.follower_id == follower_id)
            .map(|e| e.id);
        if notifiable_id.is_none() {
            tracing::warn!(
                follower_id,
                "Triggering follower is not in the window of {}",
                key
            );
        }

        // Whole row in one write; a failure here persists nothing new
        let update = NotificationUpdate {
            key,
            notifiable_id,
            notifiable_type: FOLLOW_NOTIFIABLE_TYPE.to_string(),
            payload,
            notified_at: self.clock.now(),
            read: command.mark_read,
        };
        let notification = self.notifications.upsert(&update).await?;

        tracing::debug!(
            notification_id = notification.id,
            followers = events.len(),
            "Saved follow notification for {}",
            key
        );

        Ok(Some(notification))
    }
}
