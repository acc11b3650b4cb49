//! 作答相关模型
//!
//! 提交请求、评分结果、历史记录与证书签发的线格式。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 历史作答记录（只读，逐场考试获取）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptHistoryEntry {
    #[serde(rename = "fecha")]
    pub date: DateTime<Utc>,
    /// 得分百分比
    #[serde(rename = "puntaje")]
    pub score: f64,
    #[serde(rename = "aprobado")]
    pub approved: bool,
}

/// 提交请求体，对应 `POST /examenes/examenes/{id}/responder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRequest {
    /// 未作答的题目不产生条目，缺失条目的处理策略由服务端决定
    #[serde(rename = "respuestas")]
    pub answers: Vec<AnswerPair>,
}

/// 单题作答：题目 ID + 所选答案 ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPair {
    #[serde(rename = "pregunta_id")]
    pub question_id: u64,
    #[serde(rename = "respuesta_id")]
    pub answer_id: u64,
}

/// 评分结果（服务端生成，收到后只读，不做本地持久化）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResult {
    #[serde(rename = "correctas")]
    pub correct: u32,
    pub total: u32,
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
    #[serde(rename = "aprobado")]
    pub approved: bool,
    #[serde(rename = "detalle", default)]
    pub detail: Vec<AttemptDetail>,
}

/// 逐题评分明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptDetail {
    #[serde(rename = "texto")]
    pub question_text: String,
    #[serde(rename = "es_correcta")]
    pub is_correct: bool,
    /// 用户选择的答案文本；未作答时为 None
    #[serde(rename = "respuesta_seleccionada", default)]
    pub selected_answer: Option<String>,
    /// 答错时服务端附带的正确答案文本
    #[serde(rename = "respuesta_correcta", default)]
    pub correct_answer: Option<String>,
}

/// 模块信息，仅用于由模块反查课程 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: u64,
    #[serde(rename = "curso_id")]
    pub course_id: u64,
}

/// 证书签发请求体，对应 `POST /certificados/emitir`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRequest {
    #[serde(rename = "usuario_id")]
    pub user_id: u64,
    #[serde(rename = "curso_id")]
    pub course_id: u64,
}
