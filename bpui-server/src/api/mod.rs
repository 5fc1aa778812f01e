//! HTTP handlers for bpui-server

pub mod add;
pub mod delete;
pub mod entries;
pub mod health;
pub mod ui;

pub use add::{add_entry, show_add_form};
pub use delete::{cancel_delete, delete_entry, start_delete};
pub use entries::{cancel_edit, edit_entry, list_entries, submit_edits};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index, serve_style_css};

use axum::extract::rejection::FormRejection;
use axum::Form;

use crate::error::{ApiError, ApiResult};
use crate::validate::EntryForm;

/// Parse the `:id` route segment
pub(crate) fn parse_id(raw: &str) -> ApiResult<u16> {
    raw.parse::<u16>()
        .map_err(|e| ApiError::BadRequest(format!("invalid entry id {:?}: {}", raw, e)))
}

/// Unwrap a form body, turning axum's rejection into a 400
pub(crate) fn form_body(form: Result<Form<EntryForm>, FormRejection>) -> ApiResult<EntryForm> {
    form.map(|Form(form)| form)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
