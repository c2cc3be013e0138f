//! Public profile projection embedded in notification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Class tag carried alongside the profile, always `{"name": "User"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileClass {
    pub name: String,
}

/// Denormalized view of a user, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: i64,
    pub class: ProfileClass,
    pub name: String,
    pub username: String,
    pub path: String,
    pub profile_image_90: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PublicProfile {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        username: impl Into<String>,
        profile_image_90: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let username = username.into();
        Self {
            id,
            class: ProfileClass {
                name: "User".to_string(),
            },
            name: name.into(),
            path: format!("/{}", username),
            username,
            profile_image_90,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_shape() {
        let profile = PublicProfile::new(4, "Ada Lovelace", "ada", None, Utc::now());
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["class"]["name"], "User");
        assert_eq!(json["path"], "/ada");
        assert_eq!(json["username"], "ada");
        assert!(json["profile_image_90"].is_null());
    }
}
