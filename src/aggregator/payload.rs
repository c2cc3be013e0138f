//! Payload construction
//!
//! `{ user, aggregated_siblings }` built from the window. The triggering
//! follower is resolved on its own and is not removed from the siblings.

use std::collections::HashSet;

use crate::domain::{FollowEvent, NotificationPayload};
use crate::error::{AppError, AppResult};
use crate::store::ProfileProjector;

/// Follower ids in window order, first occurrence wins
pub fn distinct_follower_ids(events: &[FollowEvent]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(events.len());
    events
        .iter()
        .map(|e| e.follower_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Build the payload, failing on the first follower without a profile
pub async fn aggregate_payload(
    profiles: &dyn ProfileProjector,
    follower_id: i64,
    events: &[FollowEvent],
) -> AppResult<NotificationPayload> {
    let sibling_ids = distinct_follower_ids(events);

    let mut lookup = sibling_ids.clone();
    if !lookup.contains(&follower_id) {
        lookup.push(follower_id);
    }
    let found = profiles.profiles_of(&lookup).await?;

    let user = found
        .get(&follower_id)
        .cloned()
        .ok_or(AppError::ProfileNotFound(follower_id))?;

    let aggregated_siblings = sibling_ids
        .iter()
        .map(|id| found.get(id).cloned().ok_or(AppError::ProfileNotFound(*id)))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(NotificationPayload {
        user,
        aggregated_siblings,
    })
}
