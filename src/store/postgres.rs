//! PostgreSQL stores
//!
//! `follows`, `users` and `notifications` tables, see
//! `migrations/0001_follow_notifications.sql`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    AggregatedNotification, FollowEvent, Followable, IdentityKey, NotificationAction,
    NotificationPayload, NotificationUpdate, PublicProfile,
};

use super::{FollowEventStore, NotificationStore, ProfileProjector, StoreError};

type FollowRow = (i64, i64, i64, String, DateTime<Utc>);

type NotificationRow = (
    i64,
    String,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    Option<serde_json::Value>,
    Option<DateTime<Utc>>,
    bool,
);

const NOTIFICATION_COLUMNS: &str = "id, action, user_id, organization_id, notifiable_id, \
     notifiable_type, json_data, notified_at, read";

fn follow_from_row(row: FollowRow) -> Result<FollowEvent, StoreError> {
    let (id, follower_id, followable_id, followable_type, created_at) = row;
    let followable = Followable::parse(&followable_type, followable_id)
        .map_err(|e| StoreError::InvalidRow(format!("follow {}: {}", id, e)))?;

    Ok(FollowEvent {
        id,
        follower_id,
        followable,
        created_at,
    })
}

fn notification_from_row(row: NotificationRow) -> Result<AggregatedNotification, StoreError> {
    let (
        id,
        action,
        user_id,
        organization_id,
        notifiable_id,
        notifiable_type,
        json_data,
        notified_at,
        read,
    ) = row;

    if action != NotificationAction::Follow.as_str() {
        return Err(StoreError::InvalidRow(format!(
            "notification {}: unexpected action '{}'",
            id, action
        )));
    }

    let target = match (user_id, organization_id) {
        (Some(user_id), None) => Followable::User(user_id),
        (None, Some(organization_id)) => Followable::Organization(organization_id),
        _ => {
            return Err(StoreError::InvalidRow(format!(
                "notification {}: exactly one of user_id, organization_id must be set",
                id
            )))
        }
    };

    let payload = json_data
        .map(serde_json::from_value::<NotificationPayload>)
        .transpose()?;

    let mut notification = AggregatedNotification::blank(id, IdentityKey::follow(target));
    notification.notifiable_id = notifiable_id;
    if let Some(notifiable_type) = notifiable_type {
        notification.notifiable_type = notifiable_type;
    }
    notification.payload = payload;
    notification.notified_at = notified_at;
    notification.read = read;

    Ok(notification)
}

/// Target column for an identity key
fn target_column(key: &IdentityKey) -> &'static str {
    match key.target {
        Followable::User(_) => "user_id",
        Followable::Organization(_) => "organization_id",
    }
}

// =========================================================================
// Follows
// =========================================================================

/// Follow relationships in the `follows` table
#[derive(Debug, Clone)]
pub struct PgFollowEventStore {
    pool: PgPool,
}

impl PgFollowEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowEventStore for PgFollowEventStore {
    async fn query(
        &self,
        followable: Followable,
        since: DateTime<Utc>,
    ) -> Result<Vec<FollowEvent>, StoreError> {
        let rows: Vec<FollowRow> = sqlx::query_as(
            r#"
            SELECT id, follower_id, followable_id, followable_type, created_at
            FROM follows
            WHERE followable_type = $1 AND followable_id = $2 AND created_at > $3
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(followable.followable_type().as_str())
        .bind(followable.id())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(follow_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FollowEvent>, StoreError> {
        let row: Option<FollowRow> = sqlx::query_as(
            r#"
            SELECT id, follower_id, followable_id, followable_type, created_at
            FROM follows
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(follow_from_row).transpose()
    }
}

// =========================================================================
// Notifications
// =========================================================================

/// Aggregated notifications in the `notifications` table
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn find_or_create_by_identity_key(
        &self,
        key: &IdentityKey,
    ) -> Result<AggregatedNotification, StoreError> {
        let column = target_column(key);

        // Partial unique index on (action, <column>) arbitrates concurrent inserts
        let sql = format!(
            r#"
            INSERT INTO notifications (action, {column}, notifiable_type)
            VALUES ($1, $2, 'Follow')
            ON CONFLICT (action, {column}) WHERE {column} IS NOT NULL DO NOTHING
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );

        let inserted: Option<NotificationRow> = sqlx::query_as(&sql)
            .bind(key.action.as_str())
            .bind(key.target.id())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = inserted {
            tracing::debug!("Created notification row for {}", key);
            return notification_from_row(row);
        }

        // Lost the race: the winner's row must be visible now
        self.find_by_identity_key(key).await?.ok_or_else(|| {
            StoreError::Conflict(format!("notification for {} deleted during upsert", key))
        })
    }

    async fn find_by_identity_key(
        &self,
        key: &IdentityKey,
    ) -> Result<Option<AggregatedNotification>, StoreError> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE action = $1 AND {} = $2",
            target_column(key)
        );

        let row: Option<NotificationRow> = sqlx::query_as(&sql)
            .bind(key.action.as_str())
            .bind(key.target.id())
            .fetch_optional(&self.pool)
            .await?;

        row.map(notification_from_row).transpose()
    }

    async fn delete(&self, notification: &AggregatedNotification) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn save(&self, notification: &AggregatedNotification) -> Result<(), StoreError> {
        let json_data = notification
            .payload
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE notifications
            SET
                notifiable_id = $2,
                notifiable_type = $3,
                json_data = $4,
                notified_at = $5,
                read = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(notification.id)
        .bind(notification.notifiable_id)
        .bind(&notification.notifiable_type)
        .bind(json_data)
        .bind(notification.notified_at)
        .bind(notification.read)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::Conflict(format!(
                "notification {} for {} no longer exists",
                notification.id, notification.key
            )));
        }

        Ok(())
    }

    async fn upsert(
        &self,
        update: &NotificationUpdate,
    ) -> Result<AggregatedNotification, StoreError> {
        let column = target_column(&update.key);
        let json_data = serde_json::to_value(&update.payload)?;

        // Single statement: the row is either absent or complete
        let sql = format!(
            r#"
            INSERT INTO notifications (
                action, {column}, notifiable_id, notifiable_type, json_data, notified_at, read
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (action, {column}) WHERE {column} IS NOT NULL
            DO UPDATE SET
                notifiable_id = EXCLUDED.notifiable_id,
                notifiable_type = EXCLUDED.notifiable_type,
                json_data = EXCLUDED.json_data,
                notified_at = EXCLUDED.notified_at,
                read = EXCLUDED.read,
                updated_at = NOW()
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );

        let row: NotificationRow = sqlx::query_as(&sql)
            .bind(update.key.action.as_str())
            .bind(update.key.target.id())
            .bind(update.notifiable_id)
            .bind(&update.notifiable_type)
            .bind(json_data)
            .bind(update.notified_at)
            .bind(update.read)
            .fetch_one(&self.pool)
            .await?;

        notification_from_row(row)
    }
}

// =========================================================================
// Profiles
// =========================================================================

/// Public profiles projected from the `users` table
#[derive(Debug, Clone)]
pub struct PgProfileProjector {
    pool: PgPool,
}

impl PgProfileProjector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileProjector for PgProfileProjector {
    async fn profiles_of(
        &self,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, PublicProfile>, StoreError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String, String, Option<String>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, name, username, profile_image, created_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, username, profile_image, created_at)| {
                (id, PublicProfile::new(id, name, username, profile_image, created_at))
            })
            .collect())
    }
}
