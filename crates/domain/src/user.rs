use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A member of the club. Created by admin registration only.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub full_name: String,
    /// Opaque bcrypt hash. Never serialized out of the API.
    pub password_hash: String,
    pub role: UserRole,
    pub verified: bool,
    pub active: bool,
    pub last_login_at: Option<i64>,
    pub login_count: i64,
    pub preferences: UserPreferences,
    /// Token mailed out for account verification or password reset.
    /// Consumed on first use.
    pub pending_token: Option<String>,
    pub integrations: Vec<CalendarIntegration>,
    pub created: i64,
    pub updated: i64,
}

impl User {
    pub fn new(email: String, full_name: String, password_hash: String, now: i64) -> Self {
        Self {
            id: Default::default(),
            email,
            full_name,
            password_hash,
            role: UserRole::User,
            verified: false,
            active: true,
            last_login_at: None,
            login_count: 0,
            preferences: Default::default(),
            pending_token: None,
            integrations: Vec::new(),
            created: now,
            updated: now,
        }
    }

    /// Whether this user should be included in club-wide fan-outs.
    pub fn is_notifiable(&self) -> bool {
        self.active && self.verified
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub email_notifications: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
        }
    }
}

/// Calendar provider link. The tokens are opaque to this server, they
/// are only handed back to the provider APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarIntegration {
    pub provider: CalendarProvider,
    pub refresh_token: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProvider {
    Google,
    Outlook,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let user = User::new(
            "kari@klubb.no".into(),
            "Kari Nordmann".into(),
            "$2b$someopaquehash".into(),
            100,
        );
        assert_eq!(user.role, UserRole::User);
        assert!(!user.verified);
        assert!(user.active);
        assert!(user.preferences.email_notifications);
        assert!(!user.is_notifiable());
    }

    #[test]
    fn notifiable_requires_active_and_verified() {
        let mut user = User::new("o@k.no".into(), "Ola".into(), "hash".into(), 0);
        user.verified = true;
        assert!(user.is_notifiable());
        user.active = false;
        assert!(!user.is_notifiable());
    }
}
