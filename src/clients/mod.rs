//! LMS API 客户端层

mod lms_client;

pub use lms_client::LmsClient;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{AttemptHistoryEntry, AttemptRequest, AttemptResult, Exam, ModuleInfo};

/// 考试 API 能力抽象
///
/// 会话层只依赖该 trait，不关心传输细节，
/// 测试时可以用内存实现替换真实 HTTP 客户端。
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// 获取考试定义（不含正确性标记）
    async fn fetch_exam(&self, exam_id: u64) -> Result<Exam, ApiError>;

    /// 获取当前用户在该考试下的历史作答记录
    async fn fetch_my_attempts(&self, exam_id: u64) -> Result<Vec<AttemptHistoryEntry>, ApiError>;

    /// 提交一次作答，由服务端评分
    async fn submit_attempt(
        &self,
        exam_id: u64,
        request: &AttemptRequest,
    ) -> Result<AttemptResult, ApiError>;

    /// 查询模块信息（模块 → 课程反查）
    async fn fetch_module(&self, module_id: u64) -> Result<ModuleInfo, ApiError>;

    /// 为用户签发课程证书
    async fn issue_certificate(&self, user_id: u64, course_id: u64) -> Result<(), ApiError>;
}
