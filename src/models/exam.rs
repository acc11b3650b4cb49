//! 考试定义模型
//!
//! 对应 `GET /examenes/examenes/{id}` 的响应结构。
//! 线格式字段名为西班牙语，通过 serde rename 映射。

use serde::{Deserialize, Serialize};

/// 考试定义
///
/// 加载后在会话内不可变。服务端在此响应中绝不会暴露答案的正确性标记，
/// 正确与否只能通过提交作答得知。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    /// 所属模块 ID，证书签发时用于反查课程
    #[serde(rename = "modulo_id", default)]
    pub module_id: Option<u64>,
    #[serde(rename = "preguntas")]
    pub questions: Vec<Question>,
}

impl Exam {
    /// 按题目 ID 查找题目
    pub fn question(&self, question_id: u64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// 题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "respuestas")]
    pub answers: Vec<Answer>,
}

impl Question {
    /// 判断某个答案是否属于本题
    pub fn has_answer(&self, answer_id: u64) -> bool {
        self.answers.iter().any(|a| a.id == answer_id)
    }
}

/// 候选答案（不含正确性标记）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: u64,
    #[serde(rename = "texto")]
    pub text: String,
}
