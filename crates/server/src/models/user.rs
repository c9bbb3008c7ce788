use serde::Serialize;

pub type UserId = i32;

#[derive(Clone, Debug)]
pub struct CreateUserRequest {
    pub name: String,
}

/// Display fields of the owning user, nested under `User` in listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnerName {
    pub name: String,
}
