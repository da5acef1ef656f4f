//! Palette handlers: component templates and detail-form layouts.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::palette::{FormResponse, TemplateListResponse};
use crate::state::AppState;

/// Lists the component templates.
///
/// `GET /templates`
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let service = state.service.lock().await;
    Json(TemplateListResponse {
        templates: service.templates(),
    })
}

/// Field layout of a component kind's detail form.
///
/// `GET /forms/{kind}`
pub async fn get_form(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<FormResponse>, ApiError> {
    let service = state.service.lock().await;
    let (kind, fields) = service.form(&kind)?;
    Ok(Json(FormResponse { kind, fields }))
}
