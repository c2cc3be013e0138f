//! Domain module
//!
//! Core domain types for follow aggregation.

pub mod error;
pub mod follow;
pub mod notification;
pub mod profile;

pub use error::DomainError;
pub use follow::{FollowData, FollowEvent, Followable, FollowableType};
pub use notification::{
    AggregatedNotification, IdentityKey, NotificationAction, NotificationPayload,
    NotificationUpdate, FOLLOW_NOTIFIABLE_TYPE,
};
pub use profile::PublicProfile;
