//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` create/update DTOs where the API accepts input

pub mod comment;
pub mod image;
pub mod profile;
pub mod session;
pub mod user;
