//! API 路由模块
//!
//! - [`health`] - 存活与健康检查
//! - [`auth`] - 登录、注册、当前用户
//! - [`projects`] - 项目管理
//! - [`services`] - 服务管理
//! - [`clients`] - 客户评价管理
//! - [`info`] - 企业信息 (单例)
//! - [`upload`] - 图片上传
//! - [`uploads`] - 本地图片静态服务

pub mod convert;

pub mod auth;
pub mod health;
pub mod upload;
pub mod uploads;

// Content APIs
pub mod clients;
pub mod info;
pub mod projects;
pub mod services;
