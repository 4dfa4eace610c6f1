//! Templated email delivery and engagement tracking.

mod service;
mod types;

pub use service::EmailService;
pub use types::{
    Click, ClickEvent, ClickListResponse, Email, EmailError, EmailListResponse, EmailResponse,
    EmailResult, OpenEvent, SendEmailRequest,
};
