use sqlx::{Error as SqlxError, Postgres, Transaction};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;

impl DbConnection {
    pub async fn init_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        create_all_tables(&mut transaction).await?;
        transaction.commit().await?;
        info!("database schema is ready");
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        drop_all_tables(&mut transaction).await?;
        transaction.commit().await?;
        Ok(())
    }
}

#[instrument(skip_all)]
pub async fn create_all_tables(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            CREATE TABLE IF NOT EXISTS users (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                name            VARCHAR(255) NOT NULL,
                created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE IF NOT EXISTS resources (
                id              bigint PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                user_id         int NOT NULL REFERENCES users(id),
                resource_name   VARCHAR(255) NOT NULL,
                resource_class  VARCHAR(255) NOT NULL,
                resource_path   VARCHAR(1024) NOT NULL,
                created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp,
                updated_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    // bookmarks are not constrained: duplicates and dangling ids are allowed
    sqlx::query(
        "
            CREATE TABLE IF NOT EXISTS my_list (
                id              bigint PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                user_id         int NOT NULL,
                resource_id     bigint NOT NULL,
                created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp,
                updated_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_tables(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TABLE IF EXISTS my_list;",
        "DROP TABLE IF EXISTS resources;",
        "DROP TABLE IF EXISTS users;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}
