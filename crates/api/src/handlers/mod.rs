pub mod auth;
pub mod catalog;
pub mod comments;
pub mod enhance;
pub mod generation;
pub mod health;
pub mod images;
pub mod likes;
pub mod profile;
pub mod tokens;
