use sqlx::{Error as SqlxError, PgExecutor, Postgres, QueryBuilder};
use tracing::instrument;

use crate::models::my_list::{MyListItem, MyListItemRow};
use crate::models::resource::{OwnerFilter, ResourceWithOwner, ResourceWithOwnerRow};
use crate::models::user::UserId;

#[instrument(skip(executor))]
pub async fn list_resources<'a, E: PgExecutor<'a>>(
    executor: E,
    filter: OwnerFilter,
) -> Result<Vec<ResourceWithOwner>, SqlxError> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "
    SELECT
        resources.id AS id, resources.user_id AS user_id,
        resources.resource_name AS resource_name, resources.resource_class AS resource_class,
        resources.resource_path AS resource_path,
        resources.created_at AS created_at, resources.updated_at AS updated_at,
        users.name AS user_name
    FROM
        resources LEFT JOIN users ON resources.user_id = users.id
    WHERE
        resources.user_id ",
    );
    query
        .push(filter.operator())
        .push(" ")
        .push_bind(filter.user_id())
        .push(" ORDER BY resources.id;");
    let rows = query
        .build_query_as::<ResourceWithOwnerRow>()
        .fetch_all(executor)
        .await?;
    Ok(rows.into_iter().map(ResourceWithOwner::from).collect())
}

#[instrument(skip(executor))]
pub async fn list_my_list<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
) -> Result<Vec<MyListItem>, SqlxError> {
    let rows: Vec<MyListItemRow> = sqlx::query_as(
        "
    SELECT
        my_list.id AS id, my_list.user_id AS user_id, my_list.resource_id AS resource_id,
        my_list.created_at AS created_at, my_list.updated_at AS updated_at,
        resources.resource_name AS resource_name, resources.resource_class AS resource_class,
        resources.resource_path AS resource_path
    FROM
        my_list LEFT JOIN resources ON my_list.resource_id = resources.id
    WHERE
        my_list.user_id = $1
    ORDER BY
        my_list.id;
    ",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(MyListItem::from).collect())
}
