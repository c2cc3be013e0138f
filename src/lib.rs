//! follow_notifications Library
//!
//! Aggregates follow events into one deduplicated notification per followed
//! user or organization.

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod db;
pub mod domain;
pub mod store;
pub mod window;

mod error;

pub use aggregator::{NewFollowerCommand, NewFollowerHandler};
pub use config::Config;
pub use domain::{AggregatedNotification, DomainError, FollowData, Followable, FollowableType};
pub use error::{AppError, AppResult};
