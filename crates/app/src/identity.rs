//! Shopper identity

use async_trait::async_trait;
use hamper::uuids::TypedUuid;
use mockall::automock;
use tokio::sync::RwLock;

/// Marker for user account ids.
#[derive(Debug)]
pub struct UserAccount;

/// User UUID
pub type UserUuid = TypedUuid<UserAccount>;

/// The identity a durable operation runs as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Identity {
    /// A guest session; cart state lives in the local persistence area.
    #[default]
    Anonymous,
    /// A signed-in user; cart state lives in the remote table store.
    Authenticated(UserUuid),
}

/// Source of the identity in effect for the current session.
#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The identity in effect right now.
    ///
    /// Sign-in can happen mid-session, so callers re-resolve on every
    /// durable operation rather than caching the result.
    async fn current_identity(&self) -> Identity;
}

/// Session-scoped identity that can change while the session is alive.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    current: RwLock<Identity>,
}

impl SessionIdentity {
    /// Creates a provider starting from the given identity.
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self {
            current: RwLock::new(identity),
        }
    }

    /// Records a sign-in.
    pub async fn sign_in(&self, user: UserUuid) {
        *self.current.write().await = Identity::Authenticated(user);
    }

    /// Records a sign-out.
    pub async fn sign_out(&self) {
        *self.current.write().await = Identity::Anonymous;
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_identity(&self) -> Identity {
        *self.current.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn a_fresh_session_is_anonymous() {
        let session = SessionIdentity::default();

        assert_eq!(session.current_identity().await, Identity::Anonymous);
    }

    #[tokio::test]
    async fn sign_in_switches_the_resolved_identity() {
        let session = SessionIdentity::default();
        let user = UserUuid::new();

        session.sign_in(user).await;

        assert_eq!(
            session.current_identity().await,
            Identity::Authenticated(user)
        );
    }

    #[tokio::test]
    async fn sign_out_reverts_to_anonymous() {
        let session = SessionIdentity::new(Identity::Authenticated(UserUuid::new()));

        session.sign_out().await;

        assert_eq!(session.current_identity().await, Identity::Anonymous);
    }
}
