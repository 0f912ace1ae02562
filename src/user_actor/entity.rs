use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserId, UserPatch};

impl Entity for User {
    type Id = UserId;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    /// Creates a new User from creation parameters.
    ///
    /// # Notes
    /// Users start without a push token; the device registers one later
    /// through an update.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, String> {
        if params.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            password_hash: params.password_hash,
            fcm_token: None,
        })
    }

    /// Emails are unique, compared case-insensitively.
    fn unique_key(&self) -> Option<String> {
        Some(self.email.trim().to_lowercase())
    }

    /// Replaces the device push token. A blank token clears it.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        let token = patch.fcm_token;
        self.fcm_token = if token.trim().is_empty() { None } else { Some(token) };
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
