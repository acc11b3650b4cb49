//! 考试会话状态机
//!
//! 驱动一次作答会话的完整生命周期：
//! 加载 → 答题 → 确认 → 提交 → 出分（通过时顺带尽力签发证书）。
//!
//! 状态转移：
//! - 加载成功且历史无通过记录 → `Answering`
//! - 加载成功且历史有通过记录 → `Locked`（重考锁）
//! - `Answering` → `ConfirmPending`（请求提交，不触网）
//! - `ConfirmPending` → `Answering`（取消，或提交失败时选择保留）
//! - `ConfirmPending` → `Submitted`（提交成功，表单被结果取代）

use tracing::{info, warn};

use crate::clients::ExamApi;
use crate::error::{ApiError, AppError, SessionError};
use crate::models::{AttemptHistoryEntry, AttemptResult, Exam};
use crate::services::{CertificateService, CertificateStatus};
use crate::workflow::selection::AttemptSelection;

/// 会话所处阶段
///
/// 加载中 / 加载失败不在枚举内：`ExamSession::load` 的 Future
/// 未完成即为加载中，返回 Err 即为加载失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 答题中，可修改选择
    Answering,
    /// 已请求提交，等待用户确认，尚未触网
    ConfirmPending,
    /// 已收到评分结果，表单被结果取代
    Submitted,
    /// 历史记录中已有通过的作答，表单永不展示
    Locked,
}

/// 一次考试作答会话
#[derive(Debug)]
pub struct ExamSession {
    exam_id: u64,
    exam: Exam,
    history: Vec<AttemptHistoryEntry>,
    selection: AttemptSelection,
    state: SessionState,
    result: Option<AttemptResult>,
    certificate: Option<CertificateStatus>,
    submit_in_flight: bool,
    user_id: Option<u64>,
}

impl ExamSession {
    /// 加载考试定义与历史记录，建立会话
    ///
    /// 两次获取互不依赖，并发进行。考试定义加载失败对会话是致命的；
    /// 历史记录只用于展示和重考锁，加载失败按空历史降级，
    /// 重复作答最终仍由服务端拦截。
    pub async fn load(
        api: &dyn ExamApi,
        exam_id: u64,
        user_id: Option<u64>,
    ) -> Result<Self, ApiError> {
        info!("📥 正在加载考试 {} ...", exam_id);

        let (exam, history) =
            futures::join!(api.fetch_exam(exam_id), api.fetch_my_attempts(exam_id));

        let exam = exam?;
        // 响应只应用于发起请求的那个考试 ID
        if exam.id != exam_id {
            return Err(ApiError::ExamIdMismatch {
                expected: exam_id,
                actual: exam.id,
            });
        }

        let history = match history {
            Ok(entries) => entries,
            Err(e) => {
                warn!("⚠️ 历史记录加载失败，按空历史处理: {}", e);
                Vec::new()
            }
        };

        // 重考锁：只要有一条通过记录，表单永不展示
        let state = if history.iter().any(|entry| entry.approved) {
            info!("🔒 考试 {} 已有通过记录，会话进入只读状态", exam_id);
            SessionState::Locked
        } else {
            info!(
                "✓ 考试 {} 加载完成，共 {} 题，历史作答 {} 次",
                exam_id,
                exam.questions.len(),
                history.len()
            );
            SessionState::Answering
        };

        Ok(Self {
            exam_id,
            exam,
            history,
            selection: AttemptSelection::new(),
            state,
            result: None,
            certificate: None,
            submit_in_flight: false,
            user_id,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn history(&self) -> &[AttemptHistoryEntry] {
        &self.history
    }

    pub fn selection(&self) -> &AttemptSelection {
        &self.selection
    }

    /// 评分结果，仅在 `Submitted` 状态下存在
    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    /// 证书签发结果，仅在通过的提交之后存在
    pub fn certificate_status(&self) -> Option<&CertificateStatus> {
        self.certificate.as_ref()
    }

    /// 为某题记录一个选择
    ///
    /// 纯本地操作，覆盖该题之前的选择，不触网。
    /// 题目或答案不属于本场考试时拒绝。
    pub fn select_answer(&mut self, question_id: u64, answer_id: u64) -> Result<(), SessionError> {
        match self.state {
            SessionState::Answering => {}
            SessionState::Locked => return Err(SessionError::Locked),
            _ => return Err(SessionError::NotAnswering),
        }

        let question = self
            .exam
            .question(question_id)
            .ok_or(SessionError::UnknownQuestion { question_id })?;
        if !question.has_answer(answer_id) {
            return Err(SessionError::AnswerMismatch {
                question_id,
                answer_id,
            });
        }

        self.selection.select(question_id, answer_id);
        Ok(())
    }

    /// 请求提交，进入确认门，不触网
    pub fn request_submit(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Answering => {
                self.state = SessionState::ConfirmPending;
                Ok(())
            }
            SessionState::Locked => Err(SessionError::Locked),
            _ => Err(SessionError::NotAnswering),
        }
    }

    /// 取消确认，回到答题状态，选择原样保留，不触网
    pub fn cancel_submit(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::ConfirmPending => {
                self.state = SessionState::Answering;
                Ok(())
            }
            _ => Err(SessionError::NoPendingConfirmation),
        }
    }

    /// 确认提交
    ///
    /// 把当前选择按题目顺序打包上送，未作答的题目不产生条目。
    /// 成功后表单被结果取代；结果为通过时尽力签发一次证书，
    /// 签发失败只记录提示。提交失败则回到答题状态，选择全部保留，
    /// 允许用户重试。
    pub async fn confirm_submit(&mut self, api: &dyn ExamApi) -> Result<&AttemptResult, AppError> {
        if self.state != SessionState::ConfirmPending {
            return Err(SessionError::NoPendingConfirmation.into());
        }
        // 每个确认周期最多一次在途提交
        if self.submit_in_flight {
            return Err(SessionError::SubmissionInFlight.into());
        }
        self.submit_in_flight = true;
        // Future 在 await 中被丢弃时也必须复位在途标记，否则会话会永远拒绝确认
        let _reset = InFlightReset(&mut self.submit_in_flight);

        let request = self.selection.to_request(&self.exam);
        info!(
            "📤 正在提交考试 {} ({}/{} 题已作答)...",
            self.exam_id,
            request.answers.len(),
            self.exam.questions.len()
        );

        let outcome = api.submit_attempt(self.exam_id, &request).await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("⚠️ 提交失败，可重试: {}", e);
                self.state = SessionState::Answering;
                return Err(e.into());
            }
        };

        info!(
            "✓ 评分完成: {}/{} ({}%), 通过: {}",
            result.correct, result.total, result.percentage, result.approved
        );

        self.state = SessionState::Submitted;
        if result.approved {
            self.certificate = Some(
                CertificateService::new()
                    .issue_for_exam(api, &self.exam, self.user_id)
                    .await,
            );
        }

        Ok(&*self.result.insert(result))
    }
}

/// 在途标记复位守卫
///
/// 不管 `confirm_submit` 正常返回、提前出错还是 Future 在 await
/// 中被丢弃，守卫析构时都会把在途标记复位。
struct InFlightReset<'a>(&'a mut bool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
