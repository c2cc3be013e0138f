//! Follow Events
//!
//! A follow is an immutable fact: one user started following a user or an
//! organization. Unfollowing deletes the row, which is what shrinks the window.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Kind of entity that can be followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowableType {
    User,
    Organization,
}

impl FollowableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowableType::User => "User",
            FollowableType::Organization => "Organization",
        }
    }
}

impl FromStr for FollowableType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(FollowableType::User),
            "Organization" => Ok(FollowableType::Organization),
            other => Err(DomainError::invalid_target_type(other)),
        }
    }
}

impl fmt::Display for FollowableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a followed entity.
///
/// Exactly one target kind is ever set, so a notification identity can never
/// be built without a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum Followable {
    User(i64),
    Organization(i64),
}

impl Followable {
    pub fn new(followable_type: FollowableType, id: i64) -> Self {
        match followable_type {
            FollowableType::User => Followable::User(id),
            FollowableType::Organization => Followable::Organization(id),
        }
    }

    /// Resolve a raw `(type, id)` pair, rejecting unknown types
    pub fn parse(followable_type: &str, id: i64) -> Result<Self, DomainError> {
        Ok(Self::new(followable_type.parse()?, id))
    }

    pub fn followable_type(&self) -> FollowableType {
        match self {
            Followable::User(_) => FollowableType::User,
            Followable::Organization(_) => FollowableType::Organization,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Followable::User(id) | Followable::Organization(id) => *id,
        }
    }
}

impl fmt::Display for Followable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.followable_type(), self.id())
    }
}

/// One directed follow relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEvent {
    pub id: i64,
    pub follower_id: i64,
    pub followable: Followable,
    pub created_at: DateTime<Utc>,
}

impl FollowEvent {
    pub fn followable_id(&self) -> i64 {
        self.followable.id()
    }

    pub fn followable_type(&self) -> FollowableType {
        self.followable.followable_type()
    }
}

/// Follow data as delivered by the follow/unfollow handlers.
///
/// `followable_type` stays a string here; it is validated when the
/// aggregation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowData {
    pub followable_id: i64,
    pub followable_type: String,
    pub follower_id: i64,
}

impl FollowData {
    pub fn new(followable_id: i64, followable_type: impl Into<String>, follower_id: i64) -> Self {
        Self {
            followable_id,
            followable_type: followable_type.into(),
            follower_id,
        }
    }

    pub fn followable(&self) -> Result<Followable, DomainError> {
        Followable::parse(&self.followable_type, self.followable_id)
    }
}

impl From<&FollowEvent> for FollowData {
    fn from(event: &FollowEvent) -> Self {
        Self {
            followable_id: event.followable_id(),
            followable_type: event.followable_type().as_str().to_string(),
            follower_id: event.follower_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(Followable::parse("User", 7).unwrap(), Followable::User(7));
        assert_eq!(
            Followable::parse("Organization", 9).unwrap(),
            Followable::Organization(9)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert_eq!(
            Followable::parse("Tag", 1),
            Err(DomainError::InvalidTargetType("Tag".to_string()))
        );
        // Case matters
        assert!(Followable::parse("user", 1).is_err());
        assert!(Followable::parse("", 1).is_err());
    }

    #[test]
    fn test_followable_display() {
        assert_eq!(Followable::Organization(42).to_string(), "Organization#42");
    }

    #[test]
    fn test_follow_data_from_json() {
        let data: FollowData = serde_json::from_value(serde_json::json!({
            "followable_id": 3,
            "followable_type": "Podcast",
            "follower_id": 11
        }))
        .unwrap();

        // Decoding succeeds; the type is rejected only when resolved
        assert_eq!(data.follower_id, 11);
        assert!(data.followable().is_err());
    }

    #[test]
    fn test_follow_data_from_event() {
        let event = FollowEvent {
            id: 1,
            follower_id: 5,
            followable: Followable::User(8),
            created_at: Utc::now(),
        };

        let data = FollowData::from(&event);
        assert_eq!(data, FollowData::new(8, "User", 5));
        assert_eq!(data.followable().unwrap(), event.followable);
    }
}
