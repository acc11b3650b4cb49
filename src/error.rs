//! 错误类型定义
//!
//! 错误分为三类：
//! - [`ApiError`] - 与 LMS API 交互时的错误（网络 / 状态码 / 响应解析）
//! - [`SessionError`] - 考试会话状态机拒绝的非法操作
//! - [`ConfigError`] - 配置错误
//!
//! 顶层用 [`AppError`] 聚合，流程层和入口处配合 `anyhow` 使用。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 客户端初始化失败
    #[error("HTTP客户端初始化失败: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回了非 2xx 状态码
    #[error("API返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应 JSON 与预期结构不符
    #[error("响应解析失败 ({endpoint}): {source}")]
    DecodeFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 响应中的考试 ID 与请求的不一致
    #[error("考试ID不一致: 请求 {expected}, 响应 {actual}")]
    ExamIdMismatch { expected: u64, actual: u64 },
}

/// 考试会话状态机错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 历史记录中已有通过的作答，会话处于只读锁定状态
    #[error("考试已通过，禁止再次提交")]
    Locked,
    /// 操作要求会话处于答题状态
    #[error("当前不在答题状态")]
    NotAnswering,
    /// 操作要求存在待确认的提交
    #[error("当前没有待确认的提交")]
    NoPendingConfirmation,
    /// 上一次提交尚未返回
    #[error("上一次提交仍在进行中")]
    SubmissionInFlight,
    /// 题目不属于本次考试
    #[error("题目 {question_id} 不在本次考试中")]
    UnknownQuestion { question_id: u64 },
    /// 答案不属于指定题目
    #[error("答案 {answer_id} 不属于题目 {question_id}")]
    AnswerMismatch { question_id: u64, answer_id: u64 },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 缺少 Bearer 凭证
    #[error("缺少 Bearer 凭证（请设置环境变量 LMS_TOKEN）")]
    MissingToken,
}
