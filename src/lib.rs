//! # Exam Session
//!
//! LMS 考试作答会话客户端：加载考试与历史记录、采集作答、
//! 确认后提交评分、通过时尽力签发证书。所有持久状态都在服务端，
//! 本 crate 只持有一次会话的瞬态状态。
//!
//! ## 架构分层
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - `ExamApi` trait + `LmsClient`（reqwest，凭证显式注入）
//!
//! ### ② 业务能力层（Services）
//! - `services/identity` - 凭证 payload 解码（仅界面提示，不验签）
//! - `services/certificate` - 模块 → 课程反查 + 尽力签发
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/selection` - 本地作答状态（题目 → 所选答案）
//! - `workflow/session` - 会话状态机（答题 / 确认 / 出分 / 锁定）
//!
//! ### ④ 前端层（App）
//! - `app` - 终端交互，渲染三种互斥视图

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{ExamApi, LmsClient};
pub use config::Config;
pub use error::{ApiError, AppError, ConfigError, SessionError};
pub use models::{AttemptRequest, AttemptResult, Exam};
pub use services::{CertificateStatus, UserIdentity};
pub use workflow::{AttemptSelection, ExamSession, SessionState};
