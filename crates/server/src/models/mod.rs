pub mod my_list;
pub mod resource;
pub mod user;
