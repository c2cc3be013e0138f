//! Window module
//!
//! Trailing-window view over follow events.

mod service;

pub use service::{RecentFollowers, DEFAULT_WINDOW_HOURS};
