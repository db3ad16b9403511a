//! Explicit session object and auth state machine
//!
//! ```text
//!   SignedOut --begin_sign_in--> Loading --complete_sign_in--> SignedIn
//!       ^                                                          |
//!       +------------------------ sign_out ------------------------+
//! ```
//!
//! `sign_out` is accepted from any state. Role switching and refreshing
//! are only valid while signed in.

use serde::{Deserialize, Serialize};

use super::error::{SessionError, SessionResult};
use super::role::{available_roles, pick_active_role, OrgMembership, Role};

/// Profile data loaded for a user at sign-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Roles stored for the user
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub membership: Option<OrgMembership>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            roles: Vec::new(),
            membership: None,
        }
    }

    /// Builder method: set email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder method: add a stored role
    pub fn role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Builder method: set organization membership
    pub fn membership(mut self, membership: OrgMembership) -> Self {
        self.membership = Some(membership);
        self
    }
}

/// An authenticated user's session
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    user_id: String,
    email: Option<String>,
    roles: Vec<Role>,
    membership: Option<OrgMembership>,
    active_role: Option<Role>,
}

impl Session {
    /// Build a session from a profile and the saved role preference
    pub fn establish(profile: UserProfile, saved_preference: Option<&str>) -> Self {
        let roles = available_roles(&profile.roles, profile.membership.as_ref());
        let active_role = pick_active_role(&roles, saved_preference);

        Self {
            user_id: profile.user_id,
            email: profile.email,
            roles,
            membership: profile.membership,
            active_role,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn active_role(&self) -> Option<Role> {
        self.active_role
    }

    /// Roles the user may switch between
    pub fn available_roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn membership(&self) -> Option<&OrgMembership> {
        self.membership.as_ref()
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.membership.as_ref().map(|m| m.organization_id.as_str())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Make another held role active
    pub fn switch_role(&mut self, role: Role) -> SessionResult<()> {
        if !self.has_role(role) {
            return Err(SessionError::RoleNotAvailable(role));
        }
        self.active_role = Some(role);
        Ok(())
    }

    /// Apply freshly loaded profile data, keeping the active role if still held
    pub fn refresh(&mut self, profile: UserProfile) -> SessionResult<()> {
        if profile.user_id != self.user_id {
            return Err(SessionError::UserMismatch {
                expected: self.user_id.clone(),
                actual: profile.user_id,
            });
        }

        let current = self.active_role.map(|r| r.as_str());
        let refreshed = Session::establish(profile, current);
        *self = refreshed;
        Ok(())
    }
}

/// Authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    SignedOut,
    /// Credentials accepted, profile and roles still loading
    Loading { user_id: String },
    SignedIn(Session),
}

impl AuthState {
    fn label(&self) -> &'static str {
        match self {
            AuthState::SignedOut => "signed out",
            AuthState::Loading { .. } => "loading",
            AuthState::SignedIn(_) => "signed in",
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            AuthState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    /// SignedOut -> Loading
    pub fn begin_sign_in(&mut self, user_id: impl Into<String>) -> SessionResult<()> {
        if !matches!(self, AuthState::SignedOut) {
            return Err(SessionError::InvalidTransition {
                state: self.label(),
                action: "begin sign-in",
            });
        }
        *self = AuthState::Loading {
            user_id: user_id.into(),
        };
        Ok(())
    }

    /// Loading -> SignedIn
    pub fn complete_sign_in(
        &mut self,
        profile: UserProfile,
        saved_preference: Option<&str>,
    ) -> SessionResult<&Session> {
        let expected = match self {
            AuthState::Loading { user_id } => user_id.clone(),
            other => {
                return Err(SessionError::InvalidTransition {
                    state: other.label(),
                    action: "complete sign-in",
                })
            }
        };

        if expected != profile.user_id {
            return Err(SessionError::UserMismatch {
                expected,
                actual: profile.user_id,
            });
        }

        *self = AuthState::SignedIn(Session::establish(profile, saved_preference));
        self.session().ok_or(SessionError::NotSignedIn)
    }

    /// Any state -> SignedOut
    pub fn sign_out(&mut self) {
        *self = AuthState::SignedOut;
    }

    /// Switch the active role of the signed-in session
    pub fn switch_role(&mut self, role: Role) -> SessionResult<()> {
        let label = self.label();
        match self.session_mut() {
            Some(session) => session.switch_role(role),
            None => Err(SessionError::InvalidTransition {
                state: label,
                action: "switch role",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::role::OrgRole;

    fn coach_profile() -> UserProfile {
        UserProfile::new("user-1")
            .email("coach@example.com")
            .role(Role::Coach)
            .role(Role::Client)
    }

    #[test]
    fn test_establish_resolves_role() {
        let session = Session::establish(coach_profile(), None);
        assert_eq!(session.active_role(), Some(Role::Coach));
        assert_eq!(session.available_roles(), &[Role::Coach, Role::Client]);

        let session = Session::establish(coach_profile(), Some("client"));
        assert_eq!(session.active_role(), Some(Role::Client));
    }

    #[test]
    fn test_switch_role() {
        let mut session = Session::establish(coach_profile(), None);

        session.switch_role(Role::Client).unwrap();
        assert_eq!(session.active_role(), Some(Role::Client));

        let err = session.switch_role(Role::Admin).unwrap_err();
        assert!(matches!(err, SessionError::RoleNotAvailable(Role::Admin)));
        assert_eq!(session.active_role(), Some(Role::Client));
    }

    #[test]
    fn test_refresh_keeps_active_role() {
        let mut session = Session::establish(coach_profile(), Some("client"));

        let updated = coach_profile().membership(OrgMembership::new("org-9", OrgRole::Admin));
        session.refresh(updated).unwrap();
        assert_eq!(session.active_role(), Some(Role::Client));
        assert!(session.has_role(Role::OrgAdmin));
        assert_eq!(session.organization_id(), Some("org-9"));

        // Active role revoked: falls back through the precedence rules
        let demoted = UserProfile::new("user-1").role(Role::Coach);
        session.refresh(demoted).unwrap();
        assert_eq!(session.active_role(), Some(Role::Coach));
    }

    #[test]
    fn test_refresh_rejects_other_user() {
        let mut session = Session::establish(coach_profile(), None);
        let err = session.refresh(UserProfile::new("user-2")).unwrap_err();
        assert!(matches!(err, SessionError::UserMismatch { .. }));
    }

    #[test]
    fn test_state_machine_happy_path() {
        let mut state = AuthState::default();
        assert!(!state.is_signed_in());

        state.begin_sign_in("user-1").unwrap();
        assert!(matches!(state, AuthState::Loading { .. }));

        let session = state.complete_sign_in(coach_profile(), None).unwrap();
        assert_eq!(session.user_id(), "user-1");
        assert!(state.is_signed_in());

        state.switch_role(Role::Client).unwrap();
        assert_eq!(state.session().unwrap().active_role(), Some(Role::Client));

        state.sign_out();
        assert_eq!(state, AuthState::SignedOut);
    }

    #[test]
    fn test_state_machine_rejects_invalid_transitions() {
        let mut state = AuthState::default();

        assert!(matches!(
            state.complete_sign_in(coach_profile(), None),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            state.switch_role(Role::Coach),
            Err(SessionError::InvalidTransition { .. })
        ));

        state.begin_sign_in("user-1").unwrap();
        assert!(matches!(
            state.begin_sign_in("user-1"),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            state.complete_sign_in(UserProfile::new("someone-else"), None),
            Err(SessionError::UserMismatch { .. })
        ));
    }

    #[test]
    fn test_sign_out_from_loading() {
        let mut state = AuthState::default();
        state.begin_sign_in("user-1").unwrap();
        state.sign_out();
        assert_eq!(state, AuthState::SignedOut);
    }
}
