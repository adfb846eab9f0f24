use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use crate::models::users::entities::UserRole;
use crate::scoring::{RubricVersion, Semester};

// 发放评教码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct IssueEvaluationCodeRequest {
    pub evaluator_role: UserRole,
    pub evaluatee_id: i64,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: Semester,
    /// 缺省时使用配置中的默认量表版本
    pub rubric_version: Option<RubricVersion>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct EvaluationCodeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub evaluatee_id: Option<i64>,
    pub school_year: Option<String>,
    pub semester: Option<Semester>,
    pub evaluator_role: Option<UserRole>,
    pub is_active: Option<String>,
}

impl EvaluationCodeListParams {
    pub fn active_filter(&self) -> Option<bool> {
        match self.is_active.as_deref() {
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            _ => None,
        }
    }
}

// 存储层查询
#[derive(Debug, Clone, Default)]
pub struct EvaluationCodeListQuery {
    pub page: i64,
    pub size: i64,
    pub evaluatee_id: Option<i64>,
    /// 只返回由该用户发放的评教码
    pub issued_by: Option<i64>,
    pub school_year: Option<String>,
    pub semester: Option<Semester>,
    pub evaluator_role: Option<UserRole>,
    pub is_active: Option<bool>,
}

// 兑换评教码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct RedeemCodeRequest {
    pub code: String,
}

// 存储层：新评教码
#[derive(Debug, Clone)]
pub struct NewEvaluationCode {
    pub evaluator_role: UserRole,
    pub evaluatee_id: i64,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: Semester,
    pub rubric_version: RubricVersion,
    pub issued_by: i64,
}
