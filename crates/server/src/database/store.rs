use async_trait::async_trait;
use sqlx::Error as SqlxError;

use crate::database::commands::{add_to_list, create_resource, delete_resource};
use crate::database::connection::DbConnection;
use crate::database::queries::{list_my_list, list_resources};
use crate::models::my_list::{AddToListRequest, MyListEntry, MyListItem};
use crate::models::resource::{
    CreateResourceRequest, OwnerFilter, Resource, ResourceId, ResourceWithOwner,
};
use crate::models::user::UserId;

/// Persistence operations behind the HTTP handlers.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    async fn create_resource(&self, request: &CreateResourceRequest)
        -> Result<Resource, SqlxError>;

    async fn list_resources(&self, filter: OwnerFilter)
        -> Result<Vec<ResourceWithOwner>, SqlxError>;

    /// Deleted row count; an unknown id is not an error.
    async fn delete_resource(&self, resource_id: ResourceId) -> Result<u64, SqlxError>;

    async fn add_to_list(&self, request: &AddToListRequest) -> Result<MyListEntry, SqlxError>;

    async fn get_my_list(&self, user_id: UserId) -> Result<Vec<MyListItem>, SqlxError>;
}

#[async_trait]
impl ResourceStore for DbConnection {
    async fn create_resource(
        &self,
        request: &CreateResourceRequest,
    ) -> Result<Resource, SqlxError> {
        create_resource(self.pool(), request).await
    }

    async fn list_resources(
        &self,
        filter: OwnerFilter,
    ) -> Result<Vec<ResourceWithOwner>, SqlxError> {
        list_resources(self.pool(), filter).await
    }

    async fn delete_resource(&self, resource_id: ResourceId) -> Result<u64, SqlxError> {
        delete_resource(self.pool(), resource_id).await
    }

    async fn add_to_list(&self, request: &AddToListRequest) -> Result<MyListEntry, SqlxError> {
        add_to_list(self.pool(), request).await
    }

    async fn get_my_list(&self, user_id: UserId) -> Result<Vec<MyListItem>, SqlxError> {
        list_my_list(self.pool(), user_id).await
    }
}
