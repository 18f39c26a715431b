use crate::controller::{ActiveView, FETCH_ERROR_MESSAGE, LoadStatus, TrendsState};
use crate::errors::AppError;
use crate::models::{DashboardData, WeeklyTrends};
use crate::state::AppState;
use crate::trends::DEFAULT_TREND_CATEGORY;
use crate::ui::{render_dashboard, render_error, render_loading, DashboardView};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub view: Option<String>,
    pub category: Option<String>,
    pub trend_category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub status: LoadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DashboardData>,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<WeeklyTrends>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, AppError> {
    let selected = query
        .view
        .as_deref()
        .map(str::parse::<ActiveView>)
        .transpose()?;
    let open_category = known_category(&state, query.category.as_deref())?;
    let trend_category =
        known_category(&state, query.trend_category.as_deref())?.unwrap_or(DEFAULT_TREND_CATEGORY);

    let mut controller = state.controller.lock().await;
    if let Some(view) = selected {
        if let Some(ticket) = controller.select_view(view) {
            state.spawn_trends_load(ticket);
        }
    }

    let page = match (controller.status(), controller.data()) {
        (LoadStatus::Error, _) => render_error(FETCH_ERROR_MESSAGE),
        (LoadStatus::Ready, Some(data)) => render_dashboard(&DashboardView {
            data: &data,
            taxonomy: &state.taxonomy,
            active_view: controller.active_view(),
            open_category,
            trends: controller.trends(),
            trend_category,
        }),
        _ => render_loading(),
    };
    Ok(Html(page))
}

pub async fn reload(State(state): State<AppState>) -> Redirect {
    state.spawn_dashboard_load().await;
    Redirect::to("/")
}

pub async fn get_dashboard(State(state): State<AppState>) -> (StatusCode, Json<DashboardResponse>) {
    let controller = state.controller.lock().await;
    let status = controller.status();
    let code = if status == LoadStatus::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let data = match status {
        LoadStatus::Ready => controller.data().map(|data| DashboardData::clone(&data)),
        _ => None,
    };
    let response = DashboardResponse {
        status,
        error: controller.error_message(),
        data,
    };
    (code, Json(response))
}

pub async fn get_trends(State(state): State<AppState>) -> (StatusCode, Json<TrendsResponse>) {
    let mut controller = state.controller.lock().await;
    if *controller.trends() == TrendsState::NotRequested {
        if let Some(ticket) = controller.begin_trends_load() {
            state.spawn_trends_load(ticket);
        }
    }

    let (code, response) = match controller.trends() {
        TrendsState::Ready(trends) => (
            StatusCode::OK,
            TrendsResponse {
                status: "ready",
                error: None,
                trends: Some(WeeklyTrends::clone(trends)),
            },
        ),
        TrendsState::Error(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            TrendsResponse {
                status: "error",
                error: Some(message.clone()),
                trends: None,
            },
        ),
        TrendsState::NotRequested | TrendsState::Loading => (
            StatusCode::SERVICE_UNAVAILABLE,
            TrendsResponse {
                status: "loading",
                error: None,
                trends: None,
            },
        ),
    };
    (code, Json(response))
}

pub async fn healthz() -> &'static str {
    "ok"
}

fn known_category(state: &AppState, name: Option<&str>) -> Result<Option<&'static str>, AppError> {
    match name {
        None => Ok(None),
        Some(name) => state
            .taxonomy
            .get(name)
            .map(|category| Some(category.name))
            .ok_or_else(|| AppError::unknown_category(name)),
    }
}
