//! User profile document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root document stored at `users/{userId}`; its presence marks a seeded user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_profile_creation() {
        let user = UserProfile::new("user-123");
        assert_eq!(user.id, "user-123");
        assert!(user.created_at <= Utc::now());
    }
}
