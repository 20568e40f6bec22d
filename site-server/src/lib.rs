//! Site Server - 企业展示网站后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (项目、服务、客户评价、企业信息、用户)
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **图片** (`images`): 图片引用解析、生命周期清理和孤儿文件对账
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! site-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、管理员提取器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── images/        # 图片引用对账
//! ├── services/      # 图片存储与删除
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod images;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{AdminUser, CurrentUser, JwtConfig, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use db::DbService;
pub use images::{ImageRefClassifier, ReconcileError, ReconcileOutcome, reconcile_orphans};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
