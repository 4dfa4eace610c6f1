use axum::{
    routing::{get, post, put},
    Router,
};

use crate::server::AppState;

use super::email::{
    email_clicked, email_clicks, email_opened, get_email, list_emails, send_email,
};
use super::health::{health, stats};
use super::metrics::prometheus_metrics;
use super::template::{
    create_template, edit_template, get_template, list_templates, revert_template,
    template_versions,
};
use super::user::{create_user, list_users};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health, Stats & Metrics
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Users
        .route("/users", get(list_users))
        .route("/users/new", post(create_user))
        // Template versions
        .route("/templates", get(list_templates))
        .route("/templates/new", post(create_template))
        .route("/templates/edit", put(edit_template))
        .route("/templates/revert", put(revert_template))
        .route("/templates/{id}", get(get_template))
        .route("/templates/{id}/versions", get(template_versions))
        // Email & provider webhooks
        .route("/email", get(list_emails).post(send_email))
        .route("/email/open", post(email_opened))
        .route("/email/click", post(email_clicked))
        .route("/email/{id}", get(get_email))
        .route("/email/{id}/clicks", get(email_clicks))
}
