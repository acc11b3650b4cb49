//! 数据模型
//!
//! LMS API 的线格式结构。所有入站 JSON 都通过这里的强类型结构解析，
//! 结构不符在客户端层转化为解析错误，不会把缺字段问题带进渲染层。

pub mod attempt;
pub mod exam;

pub use attempt::{
    AnswerPair, AttemptDetail, AttemptHistoryEntry, AttemptRequest, AttemptResult,
    CertificateRequest, ModuleInfo,
};
pub use exam::{Answer, Exam, Question};
