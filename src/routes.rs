// Route definitions

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use warp::{Filter, Reply};

use crate::error::handle_rejection;
use crate::handlers;
use crate::pages::Page;
use crate::state::AppState;

pub fn configure_routes(
    state: Arc<AppState>,
    static_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // GET /
    let index = warp::path::end()
        .and(warp::get())
        .map(|| Page::Index)
        .and(with_state(state.clone()))
        .and_then(handlers::page_handler);

    // GET /chat-page
    let chat_page = warp::path("chat-page")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| Page::Chat)
        .and(with_state(state.clone()))
        .and_then(handlers::page_handler);

    // GET /precos
    let pricing = warp::path("precos")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| Page::Pricing)
        .and(with_state(state.clone()))
        .and_then(handlers::page_handler);

    // POST /leads
    let leads = warp::path("leads")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(warp::body::json())
        .and_then(handlers::leads_handler);

    // POST /chat
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state))
        .and(warp::body::json())
        .and_then(handlers::chat_handler);

    // GET /static/...
    let assets = warp::path("static").and(warp::fs::dir(static_dir));

    index
        .or(chat_page)
        .or(pricing)
        .or(leads)
        .or(chat)
        .or(assets)
        .recover(handle_rejection)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
