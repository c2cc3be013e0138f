//! Command definitions

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, FollowData, Followable};

/// Command to re-aggregate the follow notification of one followable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFollowerCommand {
    #[serde(flatten)]
    pub follow: FollowData,
    /// Store the notification as already read
    #[serde(default, alias = "is_read")]
    pub mark_read: bool,
}

impl NewFollowerCommand {
    pub fn new(followable_id: i64, followable_type: impl Into<String>, follower_id: i64) -> Self {
        Self::from_follow_data(FollowData::new(followable_id, followable_type, follower_id))
    }

    pub fn from_follow_data(follow: FollowData) -> Self {
        Self {
            follow,
            mark_read: false,
        }
    }

    pub fn with_read(mut self, mark_read: bool) -> Self {
        self.mark_read = mark_read;
        self
    }

    pub fn follower_id(&self) -> i64 {
        self.follow.follower_id
    }

    pub fn followable(&self) -> Result<Followable, DomainError> {
        self.follow.followable()
    }
}

impl From<FollowData> for NewFollowerCommand {
    fn from(follow: FollowData) -> Self {
        Self::from_follow_data(follow)
    }
}
