//! Aggregated Notifications
//!
//! One row per followed entity and action, rewritten in place every time the
//! window is recomputed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Followable, PublicProfile};

/// Notifiable tag stored on follow notifications
pub const FOLLOW_NOTIFIABLE_TYPE: &str = "Follow";

/// Notification action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationAction {
    Follow,
}

impl NotificationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationAction::Follow => "Follow",
        }
    }
}

/// `(action, target)` pair; at most one notification exists per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub action: NotificationAction,
    pub target: Followable,
}

impl IdentityKey {
    pub fn follow(target: Followable) -> Self {
        Self {
            action: NotificationAction::Follow,
            target,
        }
    }

    /// Value for the `user_id` column
    pub fn user_id(&self) -> Option<i64> {
        match self.target {
            Followable::User(id) => Some(id),
            Followable::Organization(_) => None,
        }
    }

    /// Value for the `organization_id` column
    pub fn organization_id(&self) -> Option<i64> {
        match self.target {
            Followable::Organization(id) => Some(id),
            Followable::User(_) => None,
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action.as_str(), self.target)
    }
}

/// Aggregate data: the triggering follower plus everyone in the window.
///
/// `aggregated_siblings` may contain `user` again when the triggering
/// follower is still inside the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub user: PublicProfile,
    pub aggregated_siblings: Vec<PublicProfile>,
}

/// The single "N users followed X" notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedNotification {
    pub id: i64,
    pub key: IdentityKey,
    pub notifiable_id: Option<i64>,
    pub notifiable_type: String,
    /// Empty only on a row that was just created and not yet saved
    pub payload: Option<NotificationPayload>,
    pub notified_at: Option<DateTime<Utc>>,
    pub read: bool,
}

impl AggregatedNotification {
    /// Fresh, unsaved state for a newly created row
    pub fn blank(id: i64, key: IdentityKey) -> Self {
        Self {
            id,
            key,
            notifiable_id: None,
            notifiable_type: FOLLOW_NOTIFIABLE_TYPE.to_string(),
            payload: None,
            notified_at: None,
            read: false,
        }
    }

    pub fn target(&self) -> Followable {
        self.key.target
    }

    /// Saved state of `update` under row `id`
    pub fn from_update(id: i64, update: &NotificationUpdate) -> Self {
        Self {
            id,
            key: update.key,
            notifiable_id: update.notifiable_id,
            notifiable_type: update.notifiable_type.clone(),
            payload: Some(update.payload.clone()),
            notified_at: Some(update.notified_at),
            read: update.read,
        }
    }
}

/// Complete state for one identity key, written in a single upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationUpdate {
    pub key: IdentityKey,
    pub notifiable_id: Option<i64>,
    pub notifiable_type: String,
    pub payload: NotificationPayload,
    pub notified_at: DateTime<Utc>,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_columns() {
        let user_key = IdentityKey::follow(Followable::User(3));
        assert_eq!(user_key.user_id(), Some(3));
        assert_eq!(user_key.organization_id(), None);

        let org_key = IdentityKey::follow(Followable::Organization(3));
        assert_eq!(org_key.user_id(), None);
        assert_eq!(org_key.organization_id(), Some(3));

        // Same numeric id, different target kind: distinct keys
        assert_ne!(user_key, org_key);
        assert_eq!(org_key.to_string(), "Follow:Organization#3");
    }

    #[test]
    fn test_blank_notification() {
        let n = AggregatedNotification::blank(1, IdentityKey::follow(Followable::User(2)));
        assert_eq!(n.notifiable_type, "Follow");
        assert!(n.payload.is_none());
        assert!(!n.read);
        assert_eq!(n.target(), Followable::User(2));
    }

    #[test]
    fn test_from_update_fills_every_field() {
        let profile = PublicProfile::new(5, "Lin", "lin", None, Utc::now());
        let update = NotificationUpdate {
            key: IdentityKey::follow(Followable::Organization(8)),
            notifiable_id: Some(41),
            notifiable_type: FOLLOW_NOTIFIABLE_TYPE.to_string(),
            payload: NotificationPayload {
                user: profile.clone(),
                aggregated_siblings: vec![profile],
            },
            notified_at: Utc::now(),
            read: true,
        };

        let n = AggregatedNotification::from_update(3, &update);
        assert_eq!(n.id, 3);
        assert_eq!(n.key, update.key);
        assert_eq!(n.notifiable_id, Some(41));
        assert_eq!(n.payload.as_ref(), Some(&update.payload));
        assert_eq!(n.notified_at, Some(update.notified_at));
        assert!(n.read);
    }
}
