//! Aggregator module
//!
//! Turns follow activity on one followable into a single consolidated
//! notification: created or refreshed while the window has followers,
//! retracted once it is empty.

mod commands;
mod handler;
mod payload;


pub use commands::NewFollowerCommand;
pub use handler::NewFollowerHandler;
pub use payload::{aggregate_payload, distinct_follower_ids};
