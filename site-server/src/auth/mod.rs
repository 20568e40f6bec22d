//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] / [`AdminUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{is_public_route, require_auth};
