use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::user::{OwnerName, UserId};

pub type ResourceId = i64;

#[derive(Clone, Debug)]
pub struct CreateResourceRequest {
    pub user_id: UserId,
    pub resource_name: String,
    pub resource_class: String,
    pub resource_path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub user_id: UserId,
    pub resource_name: String,
    pub resource_class: String,
    /// Hosted file URL returned by the file host.
    pub resource_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A resource row joined with its owner's name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceWithOwner {
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(rename = "User")]
    pub user: Option<OwnerName>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ResourceWithOwnerRow {
    #[sqlx(flatten)]
    pub resource: Resource,
    pub user_name: Option<String>,
}

impl From<ResourceWithOwnerRow> for ResourceWithOwner {
    fn from(row: ResourceWithOwnerRow) -> Self {
        Self {
            resource: row.resource,
            user: row.user_name.map(|name| OwnerName { name }),
        }
    }
}

/// Typed ownership predicate used by resource listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerFilter {
    OwnedBy(UserId),
    NotOwnedBy(UserId),
}

impl OwnerFilter {
    pub fn user_id(&self) -> UserId {
        match self {
            Self::OwnedBy(id) | Self::NotOwnedBy(id) => *id,
        }
    }

    /// SQL comparison operator applied to `resources.user_id`.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::OwnedBy(_) => "=",
            Self::NotOwnedBy(_) => "<>",
        }
    }
}
