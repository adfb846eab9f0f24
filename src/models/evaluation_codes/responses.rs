use serde::Serialize;
use ts_rs::TS;

use super::entities::{EvaluationAssignment, EvaluationCode, PendingAssignment};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct EvaluationCodeResponse {
    pub code: EvaluationCode,
    pub evaluatee: UserSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct EvaluationCodeListResponse {
    pub items: Vec<EvaluationCode>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct RedeemCodeResponse {
    pub assignment: EvaluationAssignment,
    pub pending: PendingAssignment,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct PendingAssignmentListResponse {
    pub items: Vec<PendingAssignment>,
}
