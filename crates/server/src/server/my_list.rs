use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use crate::error::RequestError;
use crate::models::my_list::{AddToListRequest, MyListEntry, MyListItem};
use crate::models::user::UserId;
use crate::server::extract::{InsertJson, ListingPath};
use crate::server::state::AppState;

pub async fn add_to_list(
    State(state): State<Arc<AppState>>,
    InsertJson(payload): InsertJson<AddToListRequest>,
) -> Result<(StatusCode, Json<MyListEntry>), RequestError> {
    let entry = state
        .store
        .add_to_list(&payload)
        .await
        .map_err(RequestError::Insert)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_my_list(
    State(state): State<Arc<AppState>>,
    ListingPath(user_id): ListingPath<UserId>,
) -> Result<Json<Vec<MyListItem>>, RequestError> {
    let items = state
        .store
        .get_my_list(user_id)
        .await
        .map_err(RequestError::Fetch)?;
    Ok(Json(items))
}

// TODO: delete the bookmark once clients send the owning user id alongside the resource id
pub async fn delete_from_list(Path(resource_id): Path<String>) -> StatusCode {
    debug!("delete-from-list requested for resource {resource_id}, not supported");
    StatusCode::NOT_IMPLEMENTED
}
