//! Adding new entries

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::info;

use super::form_body;
use crate::error::ApiResult;
use crate::validate::{validate_form, EntryForm, FieldErrors};
use crate::views::AddRowTemplate;
use crate::AppState;

/// Event the page listens for to reload the table
pub const ENTRIES_CHANGED: &str = "entriesChanged";

/// GET /actions/add
pub async fn show_add_form() -> ApiResult<Html<String>> {
    let form = EntryForm::default();
    Ok(Html(AddRowTemplate::new(&form, &FieldErrors::new()).render()?))
}

/// PUT /actions/add
///
/// On success the form is cleared and `HX-Trigger` tells the page to
/// reload the table.
pub async fn add_entry(
    State(state): State<AppState>,
    form: Result<Form<EntryForm>, FormRejection>,
) -> ApiResult<Response> {
    let form = form_body(form)?;

    let errors = validate_form(&form);
    if !errors.is_empty() {
        let html = AddRowTemplate::new(&form, &errors).render()?;
        return Ok(Html(html).into_response());
    }

    // The backend assigns the real ID
    let mut entry = form.to_entry(0)?;
    state.source.add_entry(&mut entry).await?;
    info!("Added new entry: {:?}", entry);

    Ok(([("HX-Trigger", ENTRIES_CHANGED)], Html(String::new())).into_response())
}
