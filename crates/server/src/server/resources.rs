use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::RequestError;
use crate::hosting::UploadRequest;
use crate::models::resource::{
    CreateResourceRequest, OwnerFilter, Resource, ResourceId, ResourceWithOwner,
};
use crate::models::user::UserId;
use crate::server::extract::{DeletePath, ListingPath};
use crate::server::state::AppState;
use crate::server::upload::{read_upload_form, UploadForm};

/// Spools the file, forwards it to the host, then records the hosted URL.
///
/// The hosted copy is destroyed again if the row cannot be inserted.
pub async fn upload_resource(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Resource>), RequestError> {
    let uploads = &state.config.uploads;
    let UploadForm {
        user_id,
        resource_name,
        resource_class,
        file,
    } = read_upload_form(multipart, &uploads.temp_dir).await?;
    info!("file received from user {user_id}: {}", file.file_name());

    let public_id = format!(
        "{}/{}",
        uploads.folder,
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    let hosted = state
        .host
        .upload(UploadRequest {
            path: file.path().to_path_buf(),
            file_name: file.file_name().to_string(),
            public_id,
            tags: vec![uploads.tag.clone()],
        })
        .await?;
    if let Err(e) = file.remove().await {
        warn!("unable to remove spooled upload: {e}");
    }

    let request = CreateResourceRequest {
        user_id,
        resource_name,
        resource_class,
        resource_path: hosted.secure_url.clone(),
    };
    match state.store.create_resource(&request).await {
        Ok(resource) => Ok((StatusCode::CREATED, Json(resource))),
        Err(e) => {
            if let Err(destroy_err) = state.host.destroy(&hosted).await {
                warn!(
                    "hosted file `{}` is orphaned, cleanup failed: {destroy_err}",
                    hosted.public_id
                );
            }
            Err(RequestError::Insert(e))
        }
    }
}

pub async fn list_all_resources(
    State(state): State<Arc<AppState>>,
    ListingPath(user_id): ListingPath<UserId>,
) -> Result<Json<Vec<ResourceWithOwner>>, RequestError> {
    let resources = state
        .store
        .list_resources(OwnerFilter::NotOwnedBy(user_id))
        .await
        .map_err(RequestError::Fetch)?;
    Ok(Json(resources))
}

pub async fn list_my_resources(
    State(state): State<Arc<AppState>>,
    ListingPath(user_id): ListingPath<UserId>,
) -> Result<Json<Vec<Resource>>, RequestError> {
    let resources = state
        .store
        .list_resources(OwnerFilter::OwnedBy(user_id))
        .await
        .map_err(RequestError::Fetch)?
        .into_iter()
        .map(|row| row.resource)
        .collect();
    Ok(Json(resources))
}

/// Succeeds whenever the delete statement runs, even if no row matched.
pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    DeletePath(resource_id): DeletePath<ResourceId>,
) -> Result<Json<Value>, RequestError> {
    let deleted = state
        .store
        .delete_resource(resource_id)
        .await
        .map_err(RequestError::Delete)?;
    info!("deleted {deleted} row(s) for resource {resource_id}");
    Ok(Json(json!({ "message": "Resource deleted successfully!" })))
}
