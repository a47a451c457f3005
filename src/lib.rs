//! # Scout Scripts
//!
//! 一组基于浏览器自动化和 Google API 的数据收集脚本
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动或连接浏览器
//! - `JsExecutor` - 唯一的 page owner，提供 eval / 等待 / 输入能力
//!
//! ### ② 业务能力层（Services）
//! - `ChallengeGuard` - 等待人机验证消失
//! - `ProfileScraper` - 读取公司主页详情
//! - `LinkedInService` - 登录并查询员工数
//! - `DriveAuth` / `DriveClient` - OAuth 授权与文件列表
//! - `KeywordMatcher` - 文件名关键词匹配
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/` - 每个脚本一个任务：读输入、逐条处理、输出结果
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use browser::open_session;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::{CompanyDetail, CompanyTable, DriveFile, EmployeeInfo};
pub use orchestrator::{CompanyDetailsJob, DriveExplorer, EmployeeCounterJob};
