use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::hosting::HostingError;

const FETCH_FAILED: &str = "An error occurred while fetching resources.";
const DELETE_FAILED: &str = "Resource couldn't be deleted!";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to fetch resources: {0}")]
    Fetch(#[source] sqlx::Error),
    #[error("unreadable listing request: {0}")]
    FetchInput(#[source] PathRejection),
    #[error("failed to delete resource: {0}")]
    Delete(#[source] sqlx::Error),
    #[error("unreadable delete request: {0}")]
    DeleteInput(#[source] PathRejection),
    #[error("failed to insert row: {0}")]
    Insert(#[source] sqlx::Error),
    #[error("unreadable insert request: {0}")]
    InsertInput(#[source] JsonRejection),
    #[error("invalid upload form: {0}")]
    Form(#[from] FormError),
    #[error("file hosting failed: {0}")]
    Hosting(#[from] HostingError),
    #[error("unable to spool upload: {0}")]
    Spool(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("missing form field `{0}`")]
    MissingField(&'static str),
    #[error("form field `{field}` is invalid: `{value}`")]
    InvalidField { field: &'static str, value: String },
}

fn fetch_failed() -> (StatusCode, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": FETCH_FAILED }),
    )
}

fn delete_failed() -> (StatusCode, Value) {
    (StatusCode::NOT_FOUND, json!({ "message": DELETE_FAILED }))
}

fn insert_failed() -> (StatusCode, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal Server Error" }),
    )
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Fetch(_) => {
                error!("{self}");
                fetch_failed()
            }
            Self::FetchInput(_) => {
                warn!("{self}");
                fetch_failed()
            }
            Self::Delete(_) => {
                error!("{self}");
                delete_failed()
            }
            Self::DeleteInput(_) => {
                warn!("{self}");
                delete_failed()
            }
            Self::Insert(_) => {
                error!("{self}");
                insert_failed()
            }
            Self::InsertInput(_) => {
                warn!("{self}");
                insert_failed()
            }
            Self::Form(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
            Self::Hosting(e) => {
                error!("file host failure: {e}");
                (StatusCode::BAD_GATEWAY, json!({ "error": e.to_string() }))
            }
            Self::Spool(e) => {
                error!("spooling upload failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Something went wrong" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
