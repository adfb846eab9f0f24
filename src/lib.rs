//! Faculty Evaluation - 教师教学评价系统后端
//!
//! 学生与上级通过评教码对教师进行评价，按 NBC-461 计算分数并生成 Annex A–D 报表。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），报表缓存与登录用户缓存
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、角色、限流与会话上下文
//! - `models`: 请求/响应模型
//! - `routes`: API 路由层
//! - `runtime`: 启动准备与优雅退出
//! - `scoring`: 量表与 NBC-461 评分计算（纯函数）
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod scoring;
pub mod services;
pub mod storage;
pub mod utils;
