//! Template version endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    CreateTemplateRequest, EditTemplateRequest, RevertTemplateRequest, TemplateListResponse,
    TemplateResponse,
};

/// GET /templates - List every stored version
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.templates.list().await;
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /templates/{id} - Active version of a family
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemplateResponse>> {
    let template = state.templates.active_version(id).await?;
    Ok(Json(TemplateResponse { template }))
}

/// GET /templates/{id}/versions - Every version of a family
#[tracing::instrument(name = "http.template_versions", skip(state))]
pub async fn template_versions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemplateListResponse>> {
    let templates = state.templates.history(id).await?;
    let total = templates.len();

    Ok(Json(TemplateListResponse { templates, total }))
}

/// POST /templates/new - Create a template family
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(name = %request.name)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<Json<TemplateResponse>> {
    let template = state.templates.create(request).await?;
    Ok(Json(TemplateResponse { template }))
}

/// PUT /templates/edit - Publish new content as the next version
#[tracing::instrument(
    name = "http.edit_template",
    skip(state, request),
    fields(template_id = request.id)
)]
pub async fn edit_template(
    State(state): State<AppState>,
    Json(request): Json<EditTemplateRequest>,
) -> Result<Json<TemplateResponse>> {
    let template = state.templates.edit(request).await?;
    Ok(Json(TemplateResponse { template }))
}

/// PUT /templates/revert - Reactivate an earlier version
#[tracing::instrument(
    name = "http.revert_template",
    skip(state, request),
    fields(template_id = request.id)
)]
pub async fn revert_template(
    State(state): State<AppState>,
    Json(request): Json<RevertTemplateRequest>,
) -> Result<Json<TemplateResponse>> {
    let template = state.templates.revert(request).await?;
    Ok(Json(TemplateResponse { template }))
}
