// GET /, /chat-page, /precos

use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error};
use warp::reply::Response;
use warp::Reply;

use crate::error::{ApiError, PAGE_FAILED};
use crate::pages::Page;
use crate::state::AppState;

pub async fn page_handler(page: Page, state: Arc<AppState>) -> Result<Response, Infallible> {
    debug!(template = page.template_name(), "GET page");

    match state.pages.render(page) {
        Ok(html) => Ok(warp::reply::html(html).into_response()),
        Err(e) => {
            error!(template = page.template_name(), error = ?e, "failed to render page");
            Ok(ApiError::Internal(PAGE_FAILED.to_string()).into_response())
        }
    }
}
