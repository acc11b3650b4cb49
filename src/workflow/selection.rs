//! 本地作答状态

use std::collections::HashMap;

use crate::models::{AnswerPair, AttemptRequest, Exam};

/// 一次考试会话内的作答选择
///
/// 题目 ID → 所选答案 ID。同一题重复选择会覆盖旧值，
/// 缺失的键表示未作答。只有用户的选择动作会修改它，
/// 提交成功或离开会话后即被丢弃。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptSelection {
    choices: HashMap<u64, u64>,
}

impl AttemptSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次选择，返回被覆盖的旧值（如有）
    pub fn select(&mut self, question_id: u64, answer_id: u64) -> Option<u64> {
        self.choices.insert(question_id, answer_id)
    }

    /// 查询某题当前的选择
    pub fn get(&self, question_id: u64) -> Option<u64> {
        self.choices.get(&question_id).copied()
    }

    /// 已作答的题目数
    pub fn answered_count(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// 按考试的题目顺序生成提交请求体
    ///
    /// 未作答的题目不产生条目；缺条目如何计分由服务端决定。
    pub fn to_request(&self, exam: &Exam) -> AttemptRequest {
        let answers = exam
            .questions
            .iter()
            .filter_map(|q| {
                self.get(q.id).map(|answer_id| AnswerPair {
                    question_id: q.id,
                    answer_id,
                })
            })
            .collect();

        AttemptRequest { answers }
    }
}
