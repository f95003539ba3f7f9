pub mod auth;
pub mod bookmark;
pub mod collection;
pub mod server;
