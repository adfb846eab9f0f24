use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;
use crate::scoring::{RubricVersion, Semester};

// 评教码：绑定评价人角色、被评人、课程/班级与学期
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct EvaluationCode {
    pub id: i64,
    /// 形如 `ABC-123`
    pub code: String,
    pub evaluator_role: UserRole,
    pub evaluatee_id: i64,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: Semester,
    pub rubric_version: RubricVersion,
    pub issued_by: i64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 评价任务状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub enum AssignmentStatus {
    Pending,
    Completed,
}

impl AssignmentStatus {
    pub const PENDING: &'static str = "pending";
    pub const COMPLETED: &'static str = "completed";

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => Self::PENDING,
            AssignmentStatus::Completed => Self::COMPLETED,
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(AssignmentStatus::Pending),
            Self::COMPLETED => Ok(AssignmentStatus::Completed),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

// 评价任务：评价人兑换评教码后生成
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct EvaluationAssignment {
    pub id: i64,
    pub code_id: i64,
    pub evaluator_id: i64,
    pub status: AssignmentStatus,
    pub redeemed_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 待完成的评价任务（含被评人与课程信息）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation_code.ts")]
pub struct PendingAssignment {
    pub assignment_id: i64,
    pub code: String,
    pub evaluatee_id: i64,
    pub evaluatee_name: String,
    pub evaluatee_position: String,
    pub subject_id: Option<i64>,
    pub subject_code: Option<String>,
    pub subject_title: Option<String>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: Semester,
    pub rubric_version: RubricVersion,
    pub redeemed_at: chrono::DateTime<chrono::Utc>,
}
