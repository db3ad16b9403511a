//! Session manager
//!
//! Owns the [`AuthState`] for one client and persists role switches
//! through a [`RolePreferenceStore`].

use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{SessionError, SessionResult};
use super::role::Role;
use super::state::{AuthState, Session, UserProfile};
use super::store::RolePreferenceStore;

/// Drives sign-in, role switching and sign-out for a single client
pub struct SessionManager {
    store: Arc<dyn RolePreferenceStore>,
    state: RwLock<AuthState>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn RolePreferenceStore>) -> Self {
        Self {
            store,
            state: RwLock::new(AuthState::SignedOut),
        }
    }

    /// Sign in with a loaded profile, applying the saved role preference
    pub async fn sign_in(&self, profile: UserProfile) -> SessionResult<Session> {
        let user_id = profile.user_id.clone();
        self.state.write().await.begin_sign_in(user_id.clone())?;

        let saved = match self.store.load(&user_id).await {
            Ok(saved) => saved,
            Err(e) => {
                // Sign in without a preference rather than fail
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load role preference");
                None
            }
        };

        let mut state = self.state.write().await;
        let session = state.complete_sign_in(profile, saved.as_deref())?.clone();

        tracing::info!(
            user_id = %session.user_id(),
            active_role = ?session.active_role(),
            roles = session.available_roles().len(),
            "User signed in"
        );

        Ok(session)
    }

    /// Switch the active role and remember the choice
    pub async fn switch_role(&self, role: Role) -> SessionResult<Session> {
        let session = {
            let mut state = self.state.write().await;
            state.switch_role(role)?;
            state.session().cloned().ok_or(SessionError::NotSignedIn)?
        };

        self.store.save(session.user_id(), role).await?;
        tracing::info!(user_id = %session.user_id(), role = %role, "Switched active role");
        Ok(session)
    }

    /// Re-resolve roles after the profile changed
    pub async fn refresh(&self, profile: UserProfile) -> SessionResult<Session> {
        let mut state = self.state.write().await;
        let session = state.session_mut().ok_or(SessionError::NotSignedIn)?;
        session.refresh(profile)?;
        Ok(session.clone())
    }

    /// Drop the session; the saved preference is kept for the next sign-in
    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        if let Some(session) = state.session() {
            tracing::info!(user_id = %session.user_id(), "User signed out");
        }
        state.sign_out();
    }

    /// Snapshot of the current session
    pub async fn current(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::role::{OrgMembership, OrgRole};
    use crate::session::store::MemoryPreferenceStore;

    fn profile() -> UserProfile {
        UserProfile::new("user-1")
            .role(Role::Client)
            .membership(OrgMembership::new("org-1", OrgRole::Admin))
    }

    #[tokio::test]
    async fn test_sign_in_uses_saved_preference() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.save("user-1", Role::Client).await.unwrap();

        let manager = SessionManager::new(store);
        let session = manager.sign_in(profile()).await.unwrap();
        assert_eq!(session.active_role(), Some(Role::Client));
    }

    #[tokio::test]
    async fn test_switch_persists_across_sign_ins() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let manager = SessionManager::new(store.clone());

        let session = manager.sign_in(profile()).await.unwrap();
        assert_eq!(session.active_role(), Some(Role::OrgAdmin));

        manager.switch_role(Role::Client).await.unwrap();
        assert_eq!(store.load("user-1").await.unwrap().as_deref(), Some("client"));

        manager.sign_out().await;
        assert!(manager.current().await.is_none());

        let session = manager.sign_in(profile()).await.unwrap();
        assert_eq!(session.active_role(), Some(Role::Client));
    }

    #[tokio::test]
    async fn test_switch_to_unavailable_role_is_not_saved() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let manager = SessionManager::new(store.clone());
        manager.sign_in(profile()).await.unwrap();

        let err = manager.switch_role(Role::Admin).await.unwrap_err();
        assert!(matches!(err, SessionError::RoleNotAvailable(Role::Admin)));
        assert_eq!(store.load("user-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_switch_requires_sign_in() {
        let manager = SessionManager::new(Arc::new(MemoryPreferenceStore::new()));
        assert!(matches!(
            manager.switch_role(Role::Client).await,
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            manager.refresh(profile()).await,
            Err(SessionError::NotSignedIn)
        ));
    }
}
