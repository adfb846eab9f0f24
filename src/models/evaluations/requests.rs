use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use crate::models::users::entities::UserRole;
use crate::scoring::{EvaluationScores, RatingInput, RubricVersion, Semester};

// 提交评教请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SubmitEvaluationRequest {
    pub assignment_id: i64,
    pub ratings: Vec<RatingInput>,
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub evaluatee_id: Option<i64>,
    pub school_year: Option<String>,
    pub semester: Option<Semester>,
    pub evaluator_role: Option<UserRole>,
}

// 存储层查询
#[derive(Debug, Clone, Default)]
pub struct EvaluationListQuery {
    pub page: i64,
    pub size: i64,
    pub evaluatee_id: Option<i64>,
    pub evaluator_id: Option<i64>,
    /// 被评人范围（学院/专业），由会话上下文决定
    pub college_id: Option<i64>,
    pub program_id: Option<i64>,
    pub school_year: Option<String>,
    pub semester: Option<Semester>,
    pub evaluator_role: Option<UserRole>,
}

// 存储层：待写入的评教
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub assignment_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub evaluator_role: UserRole,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: Semester,
    pub rubric_version: RubricVersion,
    pub scores: EvaluationScores,
    pub comments: Option<String>,
    pub evaluator_name: String,
    pub evaluator_position: String,
    pub ratings: Vec<RatingInput>,
}
