use std::sync::Arc;

use crate::domain::user::models::UserId;
use crate::user::ports::CredentialStore;

/// Per-request admission check for user-owned resources.
///
/// A verified identity may only reach its own resource, and only while its
/// account is active. The decision is taken against the store on every call,
/// so a soft-delete is effective from the next request on.
pub struct Authorizer<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S> Authorizer<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Decide whether `identity` may access the resource owned by `requested`.
    ///
    /// Store failures deny access.
    pub async fn authorize(&self, identity: UserId, requested: UserId) -> bool {
        if identity != requested {
            tracing::debug!(
                user_id = %identity,
                requested_id = %requested,
                "Authorization denied: resource owned by another user"
            );
            return false;
        }

        match self.store.find_by_id(identity).await {
            Ok(Some(user)) if user.is_active() => true,
            Ok(Some(_)) => {
                tracing::debug!(user_id = %identity, "Authorization denied: account deleted");
                false
            }
            Ok(None) => {
                tracing::debug!(user_id = %identity, "Authorization denied: unknown user");
                false
            }
            Err(e) => {
                tracing::warn!(user_id = %identity, error = %e, "Authorization lookup failed");
                false
            }
        }
    }
}
