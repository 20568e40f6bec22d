//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Whether a request may pass without a token
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (健康检查、静态图片)
/// - `POST /api/auth/login`
/// - 内容读取 (`GET`)，`/api/auth/me` 除外
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }
    if path == "/api/auth/login" && method == Method::POST {
        return true;
    }
    method == Method::GET && path != "/api/auth/me"
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，
/// 成功后将 [`CurrentUser`] 注入请求扩展。
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(jwt_rejection(e))
        }
    }
}

pub(crate) fn jwt_rejection(e: JwtError) -> AppError {
    match e {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::GET, "/health"));
        assert!(is_public_route(&Method::GET, "/uploads/a.jpg"));
        assert!(is_public_route(&Method::OPTIONS, "/api/projects"));
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::GET, "/api/projects"));
        assert!(is_public_route(&Method::GET, "/api/info"));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&Method::POST, "/api/auth/register"));
        assert!(!is_public_route(&Method::POST, "/api/projects"));
        assert!(!is_public_route(&Method::PUT, "/api/clients/client:1"));
        assert!(!is_public_route(&Method::DELETE, "/api/services/s1"));
        assert!(!is_public_route(&Method::POST, "/api/upload"));
        assert!(!is_public_route(&Method::GET, "/api/auth/login"));
    }
}
