//! InnoTrue Session
//!
//! Authentication state and role resolution for a signed-in user:
//!
//! - **role**: Platform roles, organization membership, active-role resolution
//! - **state**: The explicit `Session` object and the `AuthState` machine
//! - **store**: Saved role preference storage (memory, JSON file)
//! - **manager**: Ties auth state to the preference store
//! - **error**: Error types

pub mod error;
pub mod manager;
pub mod role;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use error::{SessionError, SessionResult};
pub use manager::SessionManager;
pub use role::{available_roles, resolve_active_role, OrgMembership, OrgRole, Role};
pub use state::{AuthState, Session, UserProfile};
pub use store::{FilePreferenceStore, MemoryPreferenceStore, RolePreferenceStore};
