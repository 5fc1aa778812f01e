//! Page and static asset serving
//!
//! Assets are compiled into the binary, so the server needs no files next to it.

use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::error::ApiResult;
use crate::views::IndexTemplate;

const STYLE_CSS: &str = include_str!("../../static/style.css");
const APP_JS: &str = include_str!("../../static/app.js");

/// GET /
///
/// Serves the main page
pub async fn serve_index() -> ApiResult<Html<String>> {
    Ok(Html(IndexTemplate::default().render()?))
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css")],
        STYLE_CSS,
    )
        .into_response()
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}
