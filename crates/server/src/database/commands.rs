use sqlx::{Error as SqlxError, PgExecutor, Row};
use tracing::{info, instrument};

use crate::models::my_list::{AddToListRequest, MyListEntry};
use crate::models::resource::{CreateResourceRequest, Resource, ResourceId};
use crate::models::user::{CreateUserRequest, UserId};

#[instrument(skip_all)]
pub async fn create_user<'a, E: PgExecutor<'a>>(
    executor: E,
    user: &CreateUserRequest,
) -> Result<UserId, SqlxError> {
    let result = sqlx::query("INSERT INTO users (name) VALUES ($1) RETURNING id;")
        .bind(&user.name)
        .fetch_one(executor)
        .await?
        .try_get("id")?;
    info!("created user with id: {}", result);
    Ok(result)
}

#[instrument(skip(executor))]
pub async fn create_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &CreateResourceRequest,
) -> Result<Resource, SqlxError> {
    let resource: Resource = sqlx::query_as(
        "
            INSERT INTO resources (user_id, resource_name, resource_class, resource_path)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, resource_name, resource_class, resource_path, created_at, updated_at;
        ",
    )
    .bind(request.user_id)
    .bind(&request.resource_name)
    .bind(&request.resource_class)
    .bind(&request.resource_path)
    .fetch_one(executor)
    .await?;
    info!("created resource with id: {}", resource.id);
    Ok(resource)
}

/// Returns the number of deleted rows, zero for an unknown id.
#[instrument(skip(executor))]
pub async fn delete_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_id: ResourceId,
) -> Result<u64, SqlxError> {
    let result = sqlx::query("DELETE FROM resources WHERE id = $1;")
        .bind(resource_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[instrument(skip(executor))]
pub async fn add_to_list<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &AddToListRequest,
) -> Result<MyListEntry, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO my_list (user_id, resource_id) VALUES ($1, $2)
            RETURNING id, user_id, resource_id, created_at, updated_at;
        ",
    )
    .bind(request.user_id)
    .bind(request.resource_id)
    .fetch_one(executor)
    .await
}
