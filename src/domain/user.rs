use super::UserId;

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Opaque credential hash produced by the account layer.
    pub password_hash: String,
    /// Device push token. `None` means no notification path exists.
    pub fcm_token: Option<String>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Device token registration. Email is the unique identity and cannot be
/// patched; a blank token clears the current one.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub fcm_token: String,
}

impl User {
    /// Returns the push token when one is present and non-blank.
    pub fn notification_token(&self) -> Option<&str> {
        self.fcm_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
