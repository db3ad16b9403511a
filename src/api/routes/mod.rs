//! API Routes
//!
//! Route handlers organized by functionality.

pub mod calendar;
pub mod health;
pub mod session;
