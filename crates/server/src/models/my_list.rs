use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::models::resource::ResourceId;
use crate::models::user::UserId;

pub type MyListId = i64;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToListRequest {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub user_id: UserId,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub resource_id: ResourceId,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MyListEntry {
    pub id: MyListId,
    pub user_id: UserId,
    pub resource_id: ResourceId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedResource {
    pub resource_name: String,
    pub resource_class: String,
    pub resource_path: String,
}

/// A bookmark with the display fields of the resource it points at.
///
/// `Resource` is `null` when the bookmarked row no longer exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MyListItem {
    #[serde(flatten)]
    pub entry: MyListEntry,
    #[serde(rename = "Resource")]
    pub resource: Option<BookmarkedResource>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MyListItemRow {
    #[sqlx(flatten)]
    pub entry: MyListEntry,
    pub resource_name: Option<String>,
    pub resource_class: Option<String>,
    pub resource_path: Option<String>,
}

impl From<MyListItemRow> for MyListItem {
    fn from(row: MyListItemRow) -> Self {
        let resource = match (row.resource_name, row.resource_class, row.resource_path) {
            (Some(resource_name), Some(resource_class), Some(resource_path)) => {
                Some(BookmarkedResource {
                    resource_name,
                    resource_class,
                    resource_path,
                })
            }
            _ => None,
        };
        Self {
            entry: row.entry,
            resource,
        }
    }
}
