use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::server::my_list::{add_to_list, delete_from_list, get_my_list};
use crate::server::resources::{
    delete_resource, list_all_resources, list_my_resources, upload_resource,
};
use crate::server::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.uploads.max_bytes;
    Router::new()
        .route("/get-my-list/:userId", get(get_my_list))
        .route("/my-resources/:userId", get(list_my_resources))
        .route("/all-resources/:userId", get(list_all_resources))
        .route("/resource", post(upload_resource))
        .route("/add-to-list", post(add_to_list))
        .route("/delete-resource/:resourceId", delete(delete_resource))
        .route("/delete-from-list/:resourceId", delete(delete_from_list))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.server.address.clone();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("starting server on: {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
