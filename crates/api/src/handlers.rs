pub mod auth;
pub mod slot;
