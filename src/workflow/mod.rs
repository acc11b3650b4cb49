//! 流程层
//!
//! 定义"一次作答"的完整流程：本地选择状态 + 会话状态机。

pub mod selection;
pub mod session;

pub use selection::AttemptSelection;
pub use session::{ExamSession, SessionState};
