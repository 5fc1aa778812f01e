//! Listing and in-place editing of entries

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::Html,
    Form,
};
use tracing::info;

use super::{form_body, parse_id};
use crate::error::ApiResult;
use crate::validate::{validate_form, EntryForm, FieldErrors};
use crate::views::{EditRowTemplate, RowTemplate, RowsTemplate};
use crate::AppState;

/// GET /entries
///
/// Every entry as a table row, in backend order.
pub async fn list_entries(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let entries = state.source.read_all().await?;

    Ok(Html(RowsTemplate { entries: &entries }.render()?))
}

/// GET /actions/edit/:id
pub async fn edit_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let id = parse_id(&id)?;
    let entry = state.source.get_entry(id).await?;

    let form = EntryForm::from(&entry);
    Ok(Html(EditRowTemplate::new(id, &form, &FieldErrors::new()).render()?))
}

/// PUT /actions/submit/:id
///
/// Invalid input comes back as the edit row with messages; valid input
/// replaces the stored entry and comes back as a plain row.
pub async fn submit_edits(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<EntryForm>, FormRejection>,
) -> ApiResult<Html<String>> {
    let id = parse_id(&id)?;
    let form = form_body(form)?;

    let errors = validate_form(&form);
    if !errors.is_empty() {
        return Ok(Html(EditRowTemplate::new(id, &form, &errors).render()?));
    }

    let entry = form.to_entry(id)?;
    state.source.update_entry(&entry).await?;
    info!("Updated entry: {:?}", entry);

    let stored = state.source.get_entry(id).await?;
    Ok(Html(RowTemplate { entry: &stored }.render()?))
}

/// GET /actions/cancel/:id
///
/// Restores the read-only row. `new` cancels the add form, which just
/// disappears.
pub async fn cancel_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    if id == "new" {
        return Ok(Html(String::new()));
    }

    let id = parse_id(&id)?;
    let entry = state.source.get_entry(id).await?;

    Ok(Html(RowTemplate { entry: &entry }.render()?))
}
