//! JSON handlers for the registered triggers.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use geppetto_domain::time::ClockTime;
use geppetto_domain::trigger::{ActionKind, EventTrigger, ScheduleKind, WindowTrigger, weekday_name};

use crate::state::AppState;

/// A weekly trigger as returned by the API.
#[derive(Debug, Serialize)]
pub struct EventTriggerView {
    pub action: ActionKind,
    pub weekday: &'static str,
    pub time: ClockTime,
    pub devices: Vec<String>,
}

impl From<&EventTrigger> for EventTriggerView {
    fn from(trigger: &EventTrigger) -> Self {
        Self {
            action: trigger.action,
            weekday: weekday_name(trigger.weekday),
            time: trigger.time,
            devices: trigger.device_names.clone(),
        }
    }
}

/// A daily window trigger as returned by the API.
#[derive(Debug, Serialize)]
pub struct WindowTriggerView {
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    pub start: ClockTime,
    pub end: ClockTime,
    pub lights: Vec<String>,
}

impl From<&WindowTrigger> for WindowTriggerView {
    fn from(trigger: &WindowTrigger) -> Self {
        Self {
            kind: trigger.kind,
            start: trigger.start,
            end: trigger.end,
            lights: trigger.light_names.clone(),
        }
    }
}

/// Body of `GET /api/triggers`.
#[derive(Debug, Serialize)]
pub struct TriggerList {
    pub events: Vec<EventTriggerView>,
    pub windows: Vec<WindowTriggerView>,
}

/// Possible responses from the list endpoints.
pub enum ListResponse<T> {
    Ok(Json<T>),
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/triggers`
pub async fn list(State(state): State<AppState>) -> ListResponse<TriggerList> {
    ListResponse::Ok(Json(TriggerList {
        events: event_views(&state),
        windows: window_views(&state),
    }))
}

/// `GET /api/triggers/events`
pub async fn list_events(State(state): State<AppState>) -> ListResponse<Vec<EventTriggerView>> {
    ListResponse::Ok(Json(event_views(&state)))
}

/// `GET /api/triggers/windows`
pub async fn list_windows(State(state): State<AppState>) -> ListResponse<Vec<WindowTriggerView>> {
    ListResponse::Ok(Json(window_views(&state)))
}

fn event_views(state: &AppState) -> Vec<EventTriggerView> {
    state.registry.events().iter().map(Into::into).collect()
}

fn window_views(state: &AppState) -> Vec<WindowTriggerView> {
    state.registry.windows().iter().map(Into::into).collect()
}
