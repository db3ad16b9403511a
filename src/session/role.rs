//! Platform roles and active-role resolution
//!
//! A user may hold several platform roles (e.g. coach and client) and may
//! belong to one organization. Exactly one role is *active* at a time and
//! drives which dashboard the user sees. Resolution is a pure function of
//! the stored roles, the organization membership and the saved preference.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::SessionError;

/// A platform role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator
    Admin,
    /// Administrator of a tenant organization
    OrgAdmin,
    /// Programme instructor
    Instructor,
    /// Coach
    Coach,
    /// Learner / coachee
    Client,
}

impl Role {
    /// Get all roles for iteration
    pub fn all() -> &'static [Role] {
        &[
            Role::Admin,
            Role::OrgAdmin,
            Role::Instructor,
            Role::Coach,
            Role::Client,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::OrgAdmin => "org_admin",
            Role::Instructor => "instructor",
            Role::Coach => "coach",
            Role::Client => "client",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| SessionError::UnknownRole(s.to_string()))
    }
}

/// Role within a tenant organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Member,
    Manager,
    Admin,
}

impl OrgRole {
    /// Whether this membership grants the org admin dashboard
    pub fn grants_org_admin(&self) -> bool {
        matches!(self, OrgRole::Admin | OrgRole::Manager)
    }
}

/// A user's membership in an organization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrgMembership {
    pub organization_id: String,
    #[serde(default)]
    pub organization_name: Option<String>,
    pub role: OrgRole,
}

impl OrgMembership {
    pub fn new(organization_id: impl Into<String>, role: OrgRole) -> Self {
        Self {
            organization_id: organization_id.into(),
            organization_name: None,
            role,
        }
    }
}

/// Roles the user can switch between
///
/// Stored roles in their original order without duplicates, plus
/// `org_admin` when the organization membership grants it.
pub fn available_roles(stored: &[Role], membership: Option<&OrgMembership>) -> Vec<Role> {
    let mut roles: Vec<Role> = Vec::with_capacity(stored.len() + 1);
    for role in stored {
        if !roles.contains(role) {
            roles.push(*role);
        }
    }

    if membership.is_some_and(|m| m.role.grants_org_admin()) && !roles.contains(&Role::OrgAdmin)
    {
        roles.push(Role::OrgAdmin);
    }

    roles
}

/// Pick the active role
///
/// Precedence: the saved preference if it names an available role, then
/// `admin`, then `org_admin`, then the first available role.
pub fn resolve_active_role(
    stored: &[Role],
    membership: Option<&OrgMembership>,
    saved_preference: Option<&str>,
) -> Option<Role> {
    let roles = available_roles(stored, membership);
    pick_active_role(&roles, saved_preference)
}

/// Same as [`resolve_active_role`] over an already computed role list
pub(crate) fn pick_active_role(roles: &[Role], saved_preference: Option<&str>) -> Option<Role> {
    if let Some(saved) = saved_preference.and_then(|s| s.parse::<Role>().ok()) {
        if roles.contains(&saved) {
            return Some(saved);
        }
    }

    [Role::Admin, Role::OrgAdmin]
        .into_iter()
        .find(|preferred| roles.contains(preferred))
        .or_else(|| roles.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> OrgMembership {
        OrgMembership::new("org-1", OrgRole::Manager)
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("org_admin".parse::<Role>().unwrap(), Role::OrgAdmin);
        assert_eq!(" coach ".parse::<Role>().unwrap(), Role::Coach);
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(SessionError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_role_serde_matches_display() {
        for role in Role::all() {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    #[test]
    fn test_available_roles() {
        let roles = available_roles(&[Role::Coach, Role::Client, Role::Coach], None);
        assert_eq!(roles, vec![Role::Coach, Role::Client]);

        let roles = available_roles(&[Role::Client], Some(&manager()));
        assert_eq!(roles, vec![Role::Client, Role::OrgAdmin]);

        let member = OrgMembership::new("org-1", OrgRole::Member);
        let roles = available_roles(&[Role::Client], Some(&member));
        assert_eq!(roles, vec![Role::Client]);

        let roles = available_roles(&[Role::OrgAdmin], Some(&manager()));
        assert_eq!(roles, vec![Role::OrgAdmin]);
    }

    #[test]
    fn test_saved_preference_wins_when_valid() {
        let stored = [Role::Admin, Role::Coach];
        assert_eq!(
            resolve_active_role(&stored, None, Some("coach")),
            Some(Role::Coach)
        );
    }

    #[test]
    fn test_invalid_preference_is_ignored() {
        let stored = [Role::Coach, Role::Admin];
        // Not held by the user
        assert_eq!(
            resolve_active_role(&stored, None, Some("instructor")),
            Some(Role::Admin)
        );
        // Not a role at all
        assert_eq!(
            resolve_active_role(&stored, None, Some("wizard")),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_precedence_without_preference() {
        assert_eq!(
            resolve_active_role(&[Role::Client, Role::Admin], Some(&manager()), None),
            Some(Role::Admin)
        );
        assert_eq!(
            resolve_active_role(&[Role::Client, Role::Coach], Some(&manager()), None),
            Some(Role::OrgAdmin)
        );
        assert_eq!(
            resolve_active_role(&[Role::Instructor, Role::Client], None, None),
            Some(Role::Instructor)
        );
        assert_eq!(resolve_active_role(&[], None, None), None);
    }

    #[test]
    fn test_membership_enables_org_admin_preference() {
        assert_eq!(
            resolve_active_role(&[Role::Client], Some(&manager()), Some("client")),
            Some(Role::Client)
        );
        assert_eq!(
            resolve_active_role(&[Role::Client], None, Some("org_admin")),
            Some(Role::Client)
        );
    }
}
