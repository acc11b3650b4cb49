//! 考试会话流程测试
//!
//! 用内存版 `ExamApi` 驱动完整状态机，记录每一次对外调用，
//! 覆盖重考锁、确认门、提交失败恢复与证书签发路径，不依赖网络。

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use exam_session::clients::ExamApi;
use exam_session::error::{ApiError, AppError, SessionError};
use exam_session::models::{
    Answer, AnswerPair, AttemptHistoryEntry, AttemptRequest, AttemptResult, Exam, ModuleInfo,
    Question,
};
use exam_session::services::CertificateStatus;
use exam_session::workflow::{ExamSession, SessionState};

/// 对外调用记录
#[derive(Debug, Clone, PartialEq)]
enum Call {
    FetchExam(u64),
    FetchAttempts(u64),
    Submit(u64, AttemptRequest),
    FetchModule(u64),
    IssueCertificate { user_id: u64, course_id: u64 },
}

/// 内存版考试 API
struct FakeApi {
    exam: Option<Exam>,
    history_fails: bool,
    history: Vec<AttemptHistoryEntry>,
    /// 每次提交按顺序消费一个预设结果；Err 表示服务端失败
    submit_outcomes: Mutex<Vec<Result<AttemptResult, ()>>>,
    course_id: u64,
    certificate_fails: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    fn new(exam: Exam) -> Self {
        Self {
            exam: Some(exam),
            history_fails: false,
            history: Vec::new(),
            submit_outcomes: Mutex::new(Vec::new()),
            course_id: 7,
            certificate_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_history(mut self, approved_flags: &[bool]) -> Self {
        self.history = approved_flags
            .iter()
            .map(|&approved| AttemptHistoryEntry {
                date: Utc::now(),
                score: if approved { 80.0 } else { 40.0 },
                approved,
            })
            .collect();
        self
    }

    fn with_submit_outcome(self, outcome: Result<AttemptResult, ()>) -> Self {
        self.submit_outcomes.lock().unwrap().push(outcome);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unavailable(endpoint: &str) -> ApiError {
    ApiError::BadStatus {
        endpoint: endpoint.to_string(),
        status: 500,
    }
}

#[async_trait]
impl ExamApi for FakeApi {
    async fn fetch_exam(&self, exam_id: u64) -> Result<Exam, ApiError> {
        self.record(Call::FetchExam(exam_id));
        self.exam.clone().ok_or_else(|| unavailable("fetch_exam"))
    }

    async fn fetch_my_attempts(&self, exam_id: u64) -> Result<Vec<AttemptHistoryEntry>, ApiError> {
        self.record(Call::FetchAttempts(exam_id));
        if self.history_fails {
            return Err(unavailable("fetch_my_attempts"));
        }
        Ok(self.history.clone())
    }

    async fn submit_attempt(
        &self,
        exam_id: u64,
        request: &AttemptRequest,
    ) -> Result<AttemptResult, ApiError> {
        self.record(Call::Submit(exam_id, request.clone()));
        let mut outcomes = self.submit_outcomes.lock().unwrap();
        assert!(!outcomes.is_empty(), "收到未预期的提交调用");
        outcomes.remove(0).map_err(|_| unavailable("submit_attempt"))
    }

    async fn fetch_module(&self, module_id: u64) -> Result<ModuleInfo, ApiError> {
        self.record(Call::FetchModule(module_id));
        Ok(ModuleInfo {
            id: module_id,
            course_id: self.course_id,
        })
    }

    async fn issue_certificate(&self, user_id: u64, course_id: u64) -> Result<(), ApiError> {
        self.record(Call::IssueCertificate { user_id, course_id });
        if self.certificate_fails {
            return Err(unavailable("issue_certificate"));
        }
        Ok(())
    }
}

/// 两题两答案的样例考试
fn sample_exam() -> Exam {
    Exam {
        id: 42,
        name: "Examen final".to_string(),
        module_id: Some(5),
        questions: vec![
            Question {
                id: 1,
                text: "Pregunta 1".to_string(),
                answers: vec![
                    Answer { id: 11, text: "A".to_string() },
                    Answer { id: 12, text: "B".to_string() },
                ],
            },
            Question {
                id: 2,
                text: "Pregunta 2".to_string(),
                answers: vec![
                    Answer { id: 21, text: "A".to_string() },
                    Answer { id: 22, text: "B".to_string() },
                ],
            },
        ],
    }
}

fn result(correct: u32, total: u32, percentage: f64, approved: bool) -> AttemptResult {
    AttemptResult {
        correct,
        total,
        percentage,
        approved,
        detail: Vec::new(),
    }
}

#[tokio::test]
async fn test_locked_when_history_has_any_approved_entry() {
    // 通过记录夹在未通过记录中间，依然必须锁定
    let api = FakeApi::new(sample_exam()).with_history(&[false, true, false]);

    let mut session = ExamSession::load(&api, 42, Some(9)).await.expect("加载应成功");

    assert_eq!(session.state(), SessionState::Locked);
    assert_eq!(session.select_answer(1, 11), Err(SessionError::Locked));
    assert_eq!(session.request_submit(), Err(SessionError::Locked));
}

#[tokio::test]
async fn test_answering_when_history_has_only_failed_entries() {
    let api = FakeApi::new(sample_exam()).with_history(&[false, false]);

    let session = ExamSession::load(&api, 42, Some(9)).await.expect("加载应成功");

    assert_eq!(session.state(), SessionState::Answering);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_history_fetch_failure_degrades_to_empty_history() {
    let mut api = FakeApi::new(sample_exam());
    api.history_fails = true;

    let session = ExamSession::load(&api, 42, Some(9)).await.expect("加载应成功");

    assert_eq!(session.state(), SessionState::Answering);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_exam_fetch_failure_is_fatal() {
    let mut api = FakeApi::new(sample_exam());
    api.exam = None;

    let err = ExamSession::load(&api, 42, Some(9)).await.unwrap_err();
    assert!(matches!(err, ApiError::BadStatus { .. }));
}

#[tokio::test]
async fn test_exam_id_mismatch_is_fatal() {
    // 响应属于另一场考试时不得应用到本会话
    let api = FakeApi::new(sample_exam());

    let err = ExamSession::load(&api, 43, Some(9)).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::ExamIdMismatch { expected: 43, actual: 42 }
    ));
}

#[tokio::test]
async fn test_cancel_keeps_selection_and_makes_no_network_call() {
    let api = FakeApi::new(sample_exam());
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    session.select_answer(1, 11).unwrap();
    session.select_answer(2, 22).unwrap();
    let snapshot = session.selection().clone();
    let calls_before = api.calls();

    session.request_submit().unwrap();
    session.cancel_submit().unwrap();

    assert_eq!(session.state(), SessionState::Answering);
    assert_eq!(session.selection(), &snapshot);
    // 确认门前后没有任何新的网络调用
    assert_eq!(api.calls(), calls_before);
}

#[tokio::test]
async fn test_submit_payload_contains_only_answered_questions() {
    let api = FakeApi::new(sample_exam())
        .with_submit_outcome(Ok(result(1, 2, 50.0, false)));
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    // 只作答第一题，第二题留空
    session.select_answer(1, 11).unwrap();
    session.request_submit().unwrap();
    session.confirm_submit(&api).await.expect("提交应成功");

    let submit = api
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::Submit(exam_id, request) => Some((exam_id, request)),
            _ => None,
        })
        .expect("应有一次提交调用");

    assert_eq!(submit.0, 42);
    assert_eq!(
        submit.1.answers,
        vec![AnswerPair { question_id: 1, answer_id: 11 }]
    );
}

#[tokio::test]
async fn test_failed_result_shows_score_and_issues_no_certificate() {
    // 场景：两题答对一题，50%，未通过
    let api = FakeApi::new(sample_exam())
        .with_submit_outcome(Ok(result(1, 2, 50.0, false)));
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    session.select_answer(1, 11).unwrap();
    session.request_submit().unwrap();
    session.confirm_submit(&api).await.expect("提交应成功");

    assert_eq!(session.state(), SessionState::Submitted);
    let scored = session.result().expect("应保存评分结果");
    assert_eq!(scored.correct, 1);
    assert_eq!(scored.total, 2);
    assert_eq!(scored.percentage, 50.0);
    assert!(!scored.approved);

    assert!(session.certificate_status().is_none());
    assert!(!api
        .calls()
        .iter()
        .any(|c| matches!(c, Call::IssueCertificate { .. })));
}

#[tokio::test]
async fn test_approved_result_issues_certificate_exactly_once() {
    // 场景：全部答对，100%，通过
    let api = FakeApi::new(sample_exam())
        .with_submit_outcome(Ok(result(2, 2, 100.0, true)));
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    session.select_answer(1, 11).unwrap();
    session.select_answer(2, 21).unwrap();
    session.request_submit().unwrap();
    session.confirm_submit(&api).await.expect("提交应成功");

    assert_eq!(session.state(), SessionState::Submitted);
    assert!(session.result().unwrap().approved);
    assert_eq!(session.certificate_status(), Some(&CertificateStatus::Issued));

    // 课程 ID 必须来自模块反查
    let calls = api.calls();
    assert!(calls.contains(&Call::FetchModule(5)));
    let issuance: Vec<_> = calls
        .iter()
        .filter(|c| matches!(c, Call::IssueCertificate { .. }))
        .collect();
    assert_eq!(issuance.len(), 1);
    assert_eq!(
        issuance[0],
        &Call::IssueCertificate { user_id: 9, course_id: 7 }
    );
}

#[tokio::test]
async fn test_certificate_failure_is_soft() {
    let mut api = FakeApi::new(sample_exam())
        .with_submit_outcome(Ok(result(2, 2, 100.0, true)));
    api.certificate_fails = true;

    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();
    session.select_answer(1, 11).unwrap();
    session.select_answer(2, 21).unwrap();
    session.request_submit().unwrap();

    // 证书失败不影响提交成功
    session.confirm_submit(&api).await.expect("提交应成功");

    assert_eq!(session.state(), SessionState::Submitted);
    assert!(session.result().unwrap().approved);
    assert!(matches!(
        session.certificate_status(),
        Some(CertificateStatus::Failed(_))
    ));
}

#[tokio::test]
async fn test_missing_identity_skips_certificate() {
    let api = FakeApi::new(sample_exam())
        .with_submit_outcome(Ok(result(2, 2, 100.0, true)));
    let mut session = ExamSession::load(&api, 42, None).await.unwrap();

    session.select_answer(1, 11).unwrap();
    session.select_answer(2, 21).unwrap();
    session.request_submit().unwrap();
    session.confirm_submit(&api).await.expect("提交应成功");

    assert!(matches!(
        session.certificate_status(),
        Some(CertificateStatus::Skipped(_))
    ));
    assert!(!api
        .calls()
        .iter()
        .any(|c| matches!(c, Call::IssueCertificate { .. })));
}

#[tokio::test]
async fn test_submit_failure_returns_to_answering_and_allows_retry() {
    let api = FakeApi::new(sample_exam())
        .with_submit_outcome(Err(()))
        .with_submit_outcome(Ok(result(1, 2, 50.0, false)));
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    session.select_answer(1, 11).unwrap();
    let snapshot = session.selection().clone();
    session.request_submit().unwrap();

    // 第一次提交：服务端失败，回到答题状态，选择保留，无结果
    let err = session.confirm_submit(&api).await.unwrap_err();
    assert!(matches!(err, AppError::Api(_)));
    assert_eq!(session.state(), SessionState::Answering);
    assert_eq!(session.selection(), &snapshot);
    assert!(session.result().is_none());

    // 用户重试：同一份选择再次提交，成功出分
    session.request_submit().unwrap();
    session.confirm_submit(&api).await.expect("重试应成功");
    assert_eq!(session.state(), SessionState::Submitted);
}

#[tokio::test]
async fn test_confirm_without_pending_confirmation_is_rejected() {
    let api = FakeApi::new(sample_exam());
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    let err = session.confirm_submit(&api).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Session(SessionError::NoPendingConfirmation)
    ));
    assert!(!api.calls().iter().any(|c| matches!(c, Call::Submit(..))));
}

#[tokio::test]
async fn test_no_further_operations_after_submitted() {
    let api = FakeApi::new(sample_exam())
        .with_submit_outcome(Ok(result(1, 2, 50.0, false)));
    let mut session = ExamSession::load(&api, 42, Some(9)).await.unwrap();

    session.select_answer(1, 11).unwrap();
    session.request_submit().unwrap();
    session.confirm_submit(&api).await.unwrap();

    assert_eq!(session.select_answer(2, 21), Err(SessionError::NotAnswering));
    assert_eq!(session.request_submit(), Err(SessionError::NotAnswering));
}
