//! In-memory stores
//!
//! Process-local implementations of the store contracts. Each store guards its
//! state with a single async mutex, which makes find-or-create and upsert
//! atomic per key.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    AggregatedNotification, FollowEvent, Followable, IdentityKey, NotificationUpdate, PublicProfile,
};

use super::{FollowEventStore, NotificationStore, ProfileProjector, StoreError};

// =========================================================================
// Follows
// =========================================================================

#[derive(Debug, Default)]
struct FollowTable {
    next_id: i64,
    rows: Vec<FollowEvent>,
}

/// Follow relationships held in memory
#[derive(Debug, Default)]
pub struct MemoryFollowStore {
    table: Mutex<FollowTable>,
}

impl MemoryFollowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a follow; an existing `(follower, followable)` pair is returned unchanged
    pub async fn follow(
        &self,
        follower_id: i64,
        followable: Followable,
        created_at: DateTime<Utc>,
    ) -> FollowEvent {
        let mut table = self.table.lock().await;

        if let Some(existing) = table
            .rows
            .iter()
            .find(|f| f.follower_id == follower_id && f.followable == followable)
        {
            return existing.clone();
        }

        table.next_id += 1;
        let event = FollowEvent {
            id: table.next_id,
            follower_id,
            followable,
            created_at,
        };
        table.rows.push(event.clone());
        event
    }

    /// Remove a follow, returning whether one existed
    pub async fn unfollow(&self, follower_id: i64, followable: Followable) -> bool {
        let mut table = self.table.lock().await;
        let before = table.rows.len();
        table
            .rows
            .retain(|f| !(f.follower_id == follower_id && f.followable == followable));
        table.rows.len() != before
    }
}

#[async_trait]
impl FollowEventStore for MemoryFollowStore {
    async fn query(
        &self,
        followable: Followable,
        since: DateTime<Utc>,
    ) -> Result<Vec<FollowEvent>, StoreError> {
        let table = self.table.lock().await;

        let mut events: Vec<FollowEvent> = table
            .rows
            .iter()
            .filter(|f| f.followable == followable && f.created_at > since)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(events)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FollowEvent>, StoreError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|f| f.id == id).cloned())
    }
}

// =========================================================================
// Notifications
// =========================================================================

#[derive(Debug, Default)]
struct NotificationTable {
    next_id: i64,
    rows: HashMap<IdentityKey, AggregatedNotification>,
}

/// Aggregated notifications held in memory, keyed by identity
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    table: Mutex<NotificationTable>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notifications
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored notification
    pub async fn all(&self) -> Vec<AggregatedNotification> {
        self.table.lock().await.rows.values().cloned().collect()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn find_or_create_by_identity_key(
        &self,
        key: &IdentityKey,
    ) -> Result<AggregatedNotification, StoreError> {
        let mut table = self.table.lock().await;

        if let Some(existing) = table.rows.get(key) {
            return Ok(existing.clone());
        }

        table.next_id += 1;
        let created = AggregatedNotification::blank(table.next_id, *key);
        table.rows.insert(*key, created.clone());
        Ok(created)
    }

    async fn find_by_identity_key(
        &self,
        key: &IdentityKey,
    ) -> Result<Option<AggregatedNotification>, StoreError> {
        Ok(self.table.lock().await.rows.get(key).cloned())
    }

    async fn delete(&self, notification: &AggregatedNotification) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .get(&notification.key)
            .is_some_and(|row| row.id == notification.id)
        {
            table.rows.remove(&notification.key);
        }
        Ok(())
    }

    async fn save(&self, notification: &AggregatedNotification) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        match table.rows.get_mut(&notification.key) {
            Some(row) if row.id == notification.id => {
                *row = notification.clone();
                Ok(())
            }
            _ => Err(StoreError::Conflict(format!(
                "notification {} for {} no longer exists",
                notification.id, notification.key
            ))),
        }
    }

    async fn upsert(
        &self,
        update: &NotificationUpdate,
    ) -> Result<AggregatedNotification, StoreError> {
        let mut table = self.table.lock().await;

        let id = match table.rows.get(&update.key) {
            Some(existing) => existing.id,
            None => {
                table.next_id += 1;
                table.next_id
            }
        };

        let saved = AggregatedNotification::from_update(id, update);
        table.rows.insert(update.key, saved.clone());
        Ok(saved)
    }
}

// =========================================================================
// Profiles
// =========================================================================

/// Public profiles held in memory
#[derive(Debug, Default)]
pub struct MemoryProfileProjector {
    profiles: RwLock<HashMap<i64, PublicProfile>>,
}

impl MemoryProfileProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: PublicProfile) {
        self.profiles.write().await.insert(profile.id, profile);
    }

    pub async fn remove(&self, user_id: i64) -> Option<PublicProfile> {
        self.profiles.write().await.remove(&user_id)
    }
}

#[async_trait]
impl ProfileProjector for MemoryProfileProjector {
    async fn profiles_of(
        &self,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, PublicProfile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| profiles.get(id).map(|p| (*id, p.clone())))
            .collect())
    }
}
