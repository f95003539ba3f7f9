pub mod auth;
pub mod json;
pub mod ownership;
pub mod response;

pub use auth::{require_session, AuthUser};
pub use json::JsonBody;
pub use ownership::{Owned, OwnershipGuard};
pub use response::{ApiResponse, ApiResult, Message};
