//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod comment;
pub mod course;
pub mod favorite;
pub mod history;
pub mod notification;
pub mod order;
pub mod rating;
pub mod session;
pub mod tool;
pub mod user;
