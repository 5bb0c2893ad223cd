use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account. Accounts are provisioned by the identity service; this API
/// only reads them and maintains the channel-ownership fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Mirrors the owned channel's avatar. Empty string until one is set.
    pub avatar_url: String,
    pub has_channel: bool,
    /// Set together with `has_channel` when the user creates their channel.
    pub channel_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user owns at most one channel; both fields are written together.
    pub fn owns_channel(&self) -> bool {
        self.has_channel && self.channel_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(has_channel: bool, channel_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "creator".to_string(),
            email: "creator@example.com".to_string(),
            avatar_url: String::new(),
            has_channel,
            channel_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owns_channel_requires_both_fields() {
        assert!(!test_user(false, None).owns_channel());
        assert!(!test_user(true, None).owns_channel());
        assert!(test_user(true, Some(Uuid::new_v4())).owns_channel());
    }
}
