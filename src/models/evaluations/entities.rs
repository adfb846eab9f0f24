use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;
use crate::scoring::{CategoryCode, RubricVersion, Score, Semester};

// 已提交的评教
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    // 匿名化后为 None，不输出
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub assignment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub evaluator_id: Option<i64>,
    pub evaluatee_id: i64,
    pub evaluator_role: UserRole,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: Semester,
    pub rubric_version: RubricVersion,
    #[ts(type = "number | null")]
    pub score_commitment: Score,
    #[ts(type = "number | null")]
    pub score_knowledge: Score,
    #[ts(type = "number | null")]
    pub score_teaching: Score,
    #[ts(type = "number | null")]
    pub score_management: Score,
    #[ts(type = "number | null")]
    pub total_score: Score,
    pub comments: Option<String>,
    pub evaluator_name: String,
    pub evaluator_position: String,
    pub evaluation_date: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 单项评分明细
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct RatingDetail {
    pub category: CategoryCode,
    pub criterion_index: usize,
    pub rating: u8,
}
