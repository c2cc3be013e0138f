//! Store module
//!
//! Collaborator contracts consumed by the aggregator, with PostgreSQL and
//! in-memory implementations.

mod error;
pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AggregatedNotification, FollowEvent, Followable, IdentityKey, NotificationUpdate, PublicProfile,
};

pub use error::StoreError;
pub use memory::{MemoryFollowStore, MemoryNotificationStore, MemoryProfileProjector};
pub use postgres::{PgFollowEventStore, PgNotificationStore, PgProfileProjector};

/// Read access to follow relationships
#[async_trait]
pub trait FollowEventStore: Send + Sync {
    /// Follows of `followable` with `created_at > since`, newest first
    async fn query(
        &self,
        followable: Followable,
        since: DateTime<Utc>,
    ) -> Result<Vec<FollowEvent>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<FollowEvent>, StoreError>;
}

/// Persistence for aggregated notifications.
///
/// `find_or_create_by_identity_key` must be atomic per key: concurrent callers
/// all observe the same row.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn find_or_create_by_identity_key(
        &self,
        key: &IdentityKey,
    ) -> Result<AggregatedNotification, StoreError>;

    async fn find_by_identity_key(
        &self,
        key: &IdentityKey,
    ) -> Result<Option<AggregatedNotification>, StoreError>;

    async fn delete(&self, notification: &AggregatedNotification) -> Result<(), StoreError>;

    /// Overwrite an existing row in place
    async fn save(&self, notification: &AggregatedNotification) -> Result<(), StoreError>;

    /// Create or overwrite the row for `update.key` with the complete state.
    ///
    /// One atomic write: a failure leaves no row, or the previous row untouched.
    async fn upsert(
        &self,
        update: &NotificationUpdate,
    ) -> Result<AggregatedNotification, StoreError>;
}

/// Resolves user ids to public profiles
#[async_trait]
pub trait ProfileProjector: Send + Sync {
    /// Profiles for every id that exists; unknown ids are simply absent
    async fn profiles_of(
        &self,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, PublicProfile>, StoreError>;

    async fn profile_of(&self, user_id: i64) -> Result<Option<PublicProfile>, StoreError> {
        let mut found = self.profiles_of(&[user_id]).await?;
        Ok(found.remove(&user_id))
    }
}
