use klubb_domain::{User, UserPreferences, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub verified: bool,
    pub active: bool,
    pub last_login_at: Option<i64>,
    pub login_count: i64,
    pub preferences: UserPreferences,
    pub created: i64,
    pub updated: i64,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id.as_string(),
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            verified: user.verified,
            active: user.active,
            last_login_at: user.last_login_at,
            login_count: user.login_count,
            preferences: user.preferences,
            created: user.created,
            updated: user.updated,
        }
    }
}
