//! API layer - HTTP endpoint handlers organized by domain.

mod email;
mod health;
mod metrics;
mod routes;
mod template;
mod user;

pub use email::{email_clicked, email_clicks, email_opened, get_email, list_emails, send_email};
pub use health::{health, stats};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{
    create_template, edit_template, get_template, list_templates, revert_template,
    template_versions,
};
pub use user::{create_user, list_users};
