//! Domain types for the server.
//!
//! These types represent validated domain objects separate from database
//! row types and from the JSON request/response shapes built on top of them.

pub mod item;
pub mod user;
pub mod validate;

pub use item::{CreateItemInput, Item, UpdateItemInput};
pub use user::{LoginInput, PublicUser, RegisterInput, User};
pub use validate::FieldIssue;
