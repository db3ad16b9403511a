//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::calendar::timezone::format_offset;
use crate::calendar::ZoneRule;
use crate::session::{OrgMembership, Role};

// ============================================
// CALENDAR DTOs
// ============================================

/// A supported timezone
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TimezoneResponse {
    /// IANA identifier
    pub id: String,
    /// Standard offset, e.g. "+0100"
    pub standard_offset: String,
    pub standard_name: String,
    /// Daylight offset, absent for zones without DST
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daylight_offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daylight_name: Option<String>,
}

impl From<&ZoneRule> for TimezoneResponse {
    fn from(zone: &ZoneRule) -> Self {
        Self {
            id: zone.id.to_string(),
            standard_offset: format_offset(zone.standard_offset),
            standard_name: zone.standard_name.to_string(),
            daylight_offset: zone.daylight.map(|d| format_offset(d.offset)),
            daylight_name: zone.daylight.map(|d| d.name.to_string()),
        }
    }
}

/// Supported timezone list
#[derive(Debug, Serialize, Deserialize)]
pub struct TimezoneListResponse {
    pub timezones: Vec<TimezoneResponse>,
    pub total: usize,
}

// ============================================
// SESSION DTOs
// ============================================

/// Active role resolution request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRoleRequest {
    /// When set and no preference is supplied, the saved preference is loaded
    #[serde(default)]
    pub user_id: Option<String>,
    /// Stored role names; unknown names are ignored
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub membership: Option<OrgMembership>,
    #[serde(default)]
    pub saved_preference: Option<String>,
}

/// Active role resolution response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRoleResponse {
    pub active_role: Option<Role>,
    pub available_roles: Vec<Role>,
}

/// Save a role preference
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePreferenceRequest {
    pub user_id: String,
    pub role: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Preference store status: "ok" or "error"
    pub preferences: String,
    /// Number of supported timezones
    pub timezones: usize,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Version string
    pub version: String,
}
