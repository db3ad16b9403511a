//! # InnoTrue Hub
//!
//! Core services of the InnoTrue coaching platform that live outside the
//! web client: calendar export and session role resolution.
//!
//! ## Features
//!
//! - **Calendar export**: RFC 5545 files for sessions, with VTIMEZONE
//!   blocks for a fixed set of zones and RRULE recurrence
//! - **Role resolution**: Pure precedence rules picking a user's active
//!   dashboard role from stored roles, organization membership and the
//!   saved preference
//! - **Sessions**: Explicit session object and auth state machine
//! - **HTTP API**: Axum server exposing both
//!
//! ## Modules
//!
//! - [`calendar`]: ICS generation and the timezone table
//! - [`session`]: Roles, sessions and saved preferences
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use innotrue_hub::calendar::{generate_ics, CalendarEvent};
//! use innotrue_hub::session::{resolve_active_role, Role};
//!
//! let event = CalendarEvent::new(
//!     "test-event-1",
//!     "Coaching Session",
//!     Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2025, 3, 15, 11, 0, 0).unwrap(),
//! );
//! let ics = generate_ics(&event).unwrap();
//! assert!(ics.contains("DTSTART:20250315T100000Z"));
//!
//! let role = resolve_active_role(&[Role::Client, Role::Admin], None, None);
//! assert_eq!(role, Some(Role::Admin));
//! ```

pub mod api;
pub mod calendar;
pub mod config;
pub mod session;

// Re-export top-level types for convenience
pub use calendar::{
    generate_ics, Attendee, AttendeeRole, CalendarError, CalendarEvent, CalendarResult, IcsFile,
    IcsGenerator, IcsOptions, Organizer, ParticipationStatus, RecurrenceFrequency,
};

pub use session::{
    resolve_active_role, AuthState, OrgMembership, OrgRole, Role, RolePreferenceStore, Session,
    SessionError, SessionManager, SessionResult, UserProfile,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{
    ApiConfig as ConfigApiConfig, CalendarConfig, Config, ConfigError, LoggingConfig,
    SessionConfig,
};
