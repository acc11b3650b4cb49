//! 证书签发（尽力而为）
//!
//! 通过考试后把"模块 → 课程"反查出来并调用签发接口。
//! 这里的任何失败都是软失败：只作为提示返回给前端，
//! 绝不改变已出分的会话状态。

use tracing::{info, warn};

use crate::clients::ExamApi;
use crate::models::Exam;

/// 证书签发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateStatus {
    /// 签发成功
    Issued,
    /// 签发失败（课程反查或签发调用出错）
    Failed(String),
    /// 缺少必要信息，本次未发起签发
    Skipped(String),
}

/// 证书签发服务
pub struct CertificateService;

impl CertificateService {
    pub fn new() -> Self {
        Self
    }

    /// 为一场已通过的考试签发课程证书
    ///
    /// 每个通过的结果只调用一次签发接口。
    pub async fn issue_for_exam(
        &self,
        api: &dyn ExamApi,
        exam: &Exam,
        user_id: Option<u64>,
    ) -> CertificateStatus {
        let Some(user_id) = user_id else {
            warn!("⚠️ 未能从凭证解码用户 ID，跳过证书签发");
            return CertificateStatus::Skipped("未能从凭证解码用户 ID".to_string());
        };

        let Some(module_id) = exam.module_id else {
            warn!("⚠️ 考试 {} 未关联模块，跳过证书签发", exam.id);
            return CertificateStatus::Skipped("考试未关联模块".to_string());
        };

        // 模块 → 课程反查
        let course_id = match api.fetch_module(module_id).await {
            Ok(module) => module.course_id,
            Err(e) => {
                warn!("⚠️ 模块 {} 反查课程失败: {}", module_id, e);
                return CertificateStatus::Failed(e.to_string());
            }
        };

        match api.issue_certificate(user_id, course_id).await {
            Ok(()) => {
                info!("🎓 证书签发成功 (课程 {})", course_id);
                CertificateStatus::Issued
            }
            Err(e) => {
                warn!("⚠️ 证书签发失败 (课程 {}): {}", course_id, e);
                CertificateStatus::Failed(e.to_string())
            }
        }
    }
}

impl Default for CertificateService {
    fn default() -> Self {
        Self::new()
    }
}
