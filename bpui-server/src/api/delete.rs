//! Deleting entries behind a confirmation dialog

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::info;

use super::parse_id;
use crate::error::ApiResult;
use crate::views::{DeleteDoneTemplate, DeleteModalTemplate};
use crate::AppState;

/// GET /actions/startDelete/:id
pub async fn start_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let id = parse_id(&id)?;
    let entry = state.source.get_entry(id).await?;

    Ok(Html(DeleteModalTemplate { entry: &entry }.render()?))
}

/// GET /actions/delete/:id
///
/// Responds with a script that closes the dialog and drops the row.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let id = parse_id(&id)?;
    let deleted = state.source.delete_entry(id).await?;
    info!("Deleted entry: {:?}", deleted);

    Ok(Html(DeleteDoneTemplate { id }.render()?))
}

/// GET /actions/cancelDel
pub async fn cancel_delete() -> Html<&'static str> {
    Html("")
}
