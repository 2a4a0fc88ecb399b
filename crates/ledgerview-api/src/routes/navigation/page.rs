//! History-mode page rendering
//!
//! Every path not claimed by the JSON API goes through the route table. The
//! default slot of the matched route is rendered inside the page shell.

use crate::error::status_for;
use crate::{base_html, nav_bar, AppState};
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use ledgerview_router::{views::escape_html, RouterError, DEFAULT_SLOT};

pub async fn page_view(State(state): State<AppState>, uri: Uri) -> Response {
    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let font = state.style.sans_css();
    match state.router.resolve(&location).await {
        Ok(resolved) => {
            let content = resolved.render(DEFAULT_SLOT).unwrap_or_default();
            let title = resolved
                .view(DEFAULT_SLOT)
                .map(|view| view.title.clone())
                .unwrap_or_else(|| resolved.name.clone());
            let nav = nav_bar(&state.router, &resolved.name);
            Html(base_html(&title, &nav, &content, &font)).into_response()
        }
        Err(error) => {
            log::debug!("Page render for {} failed: {}", location, error);
            let status = status_for(&error);
            let nav = nav_bar(&state.router, "");
            let content = error_content(status, &error);
            (status, Html(base_html("Error", &nav, &content, &font))).into_response()
        }
    }
}

fn error_content(status: StatusCode, error: &RouterError) -> String {
    let heading = match error {
        RouterError::RouteNotFound { .. } => "Page not found",
        RouterError::ViewLoad { .. } => "This page could not be loaded",
        _ => "Something went wrong",
    };
    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6' data-status='{}'>
    <h2 class='text-2xl font-bold mb-2'>{}</h2>
    <p class='text-gray-600'>{}</p>
</div>"#,
        status.as_u16(),
        heading,
        escape_html(&error.to_string())
    )
}
