//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 每个脚本对应一个编排模块：读取输入、持有浏览器或 API 会话、
//! 逐条调用能力层，最后整理输出。
//!
//! ## 模块划分
//!
//! ### `company_details` - 公司主页详情
//! - 读取 `Url` 列
//! - 逐个打开主页，必要时等待人机验证
//! - 以表格形式输出详情
//!
//! ### `employee_counter` - LinkedIn 员工数
//! - 读取 `Companies` 列
//! - 登录后逐个搜索公司
//! - 把主页链接和员工数写回 CSV
//!
//! ### `drive_explorer` - Google Drive 文件
//! - OAuth 授权
//! - 列出文件，或按关键词匹配文件名
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (处理整个输入文件)
//!     ↓
//! services (能力层：scrape / login / lookup / auth / match)
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```

pub mod company_details;
pub mod drive_explorer;
pub mod employee_counter;

pub use company_details::CompanyDetailsJob;
pub use drive_explorer::DriveExplorer;
pub use employee_counter::EmployeeCounterJob;
