use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 专业（隶属学院）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/program.ts")]
pub struct Program {
    pub id: i64,
    pub college_id: i64,
    pub code: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
