pub mod auth;
pub mod response;

pub use auth::{bearer_auth, require_owner, AuthUser};
pub use response::{ApiResponse, ApiResult};
