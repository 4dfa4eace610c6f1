//! Email sending and provider webhook endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::email::{
    ClickEvent, ClickListResponse, EmailListResponse, EmailResponse, OpenEvent, SendEmailRequest,
};
use crate::error::Result;
use crate::server::AppState;

/// GET /email - List submitted emails
#[tracing::instrument(name = "http.list_emails", skip(state))]
pub async fn list_emails(State(state): State<AppState>) -> Json<EmailListResponse> {
    let emails = state.emails.list().await;
    let total = emails.len();

    Json(EmailListResponse { emails, total })
}

/// GET /email/{id} - Get one email by provider message id
#[tracing::instrument(name = "http.get_email", skip(state))]
pub async fn get_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmailResponse>> {
    let email = state.emails.get(&id).await?;
    Ok(Json(EmailResponse { email }))
}

/// GET /email/{id}/clicks - Clicks recorded for an email
#[tracing::instrument(name = "http.email_clicks", skip(state))]
pub async fn email_clicks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClickListResponse>> {
    let clicks = state.emails.clicks_for(&id).await?;
    let total = clicks.len();

    Ok(Json(ClickListResponse { clicks, total }))
}

/// POST /email - Send a templated email to a user
#[tracing::instrument(
    name = "http.send_email",
    skip(state, request),
    fields(user_id = %request.user_id, template_id = request.template_id)
)]
pub async fn send_email(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<EmailResponse>> {
    let email = state.emails.send(request).await?;
    Ok(Json(EmailResponse { email }))
}

/// POST /email/open - Provider open webhook
#[tracing::instrument(name = "http.email_open", skip(state, event))]
pub async fn email_opened(
    State(state): State<AppState>,
    Json(event): Json<OpenEvent>,
) -> Result<StatusCode> {
    state.emails.record_open(event).await?;
    Ok(StatusCode::OK)
}

/// POST /email/click - Provider click webhook
#[tracing::instrument(name = "http.email_click", skip(state, event))]
pub async fn email_clicked(
    State(state): State<AppState>,
    Json(event): Json<ClickEvent>,
) -> Result<StatusCode> {
    state.emails.record_click(event).await?;
    Ok(StatusCode::OK)
}
