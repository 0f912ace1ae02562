use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{User, UserCreate, UserId, UserPatch};
use crate::user_actor::UserError;

/// Client for the user directory.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, fn get_user);

impl UserClient {
    /// # Errors
    /// [`UserError::AlreadyExists`] when the email is taken.
    #[instrument(skip(self, user), fields(user_email = %user.email))]
    pub async fn create_user(&self, user: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.create(user).await.map_err(UserError::from)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: String) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let wanted = email.trim().to_lowercase();
        let mut found = self
            .inner
            .query(move |user: &User| user.email.trim().to_lowercase() == wanted)
            .await?;
        Ok(found.pop())
    }

    /// Registers or replaces the device push token. An empty token clears it.
    #[instrument(skip(self, token))]
    pub async fn update_fcm_token(&self, id: UserId, token: String) -> Result<User, UserError> {
        debug!("Sending request");
        let patch = UserPatch { fcm_token: token };
        self.inner
            .update(id, patch)
            .await
            .map_err(|e| UserError::from_framework(id, e))
    }
}
