//! Calendar Routes
//!
//! Calendar export endpoints.
//!
//! - POST /api/v1/calendar/ics - Render an event as an .ics download
//! - GET /api/v1/calendar/timezones - List supported timezones

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{TimezoneListResponse, TimezoneResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::calendar::{supported_zones, CalendarEvent};

/// POST /api/v1/calendar/ics
///
/// Render one event as an iCalendar attachment.
pub async fn export_ics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CalendarEvent>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(event) = payload?;

    if !state.config.enable_export {
        return Err(ApiError::Validation(
            "Calendar export is disabled".to_string(),
        ));
    }

    let file = state.generator.file(&event)?;

    tracing::info!(event_id = %event.id, filename = %file.filename, "Exported calendar event");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        Body::from(file.body),
    )
        .into_response())
}

/// GET /api/v1/calendar/timezones
///
/// List the zones that produce a VTIMEZONE block.
pub async fn list_timezones() -> Json<TimezoneListResponse> {
    let timezones: Vec<TimezoneResponse> = supported_zones().iter().map(Into::into).collect();

    Json(TimezoneListResponse {
        total: timezones.len(),
        timezones,
    })
}
