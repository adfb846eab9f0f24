use serde::Serialize;
use ts_rs::TS;

use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserSummary;
use crate::scoring::annex::{AnnexA, AnnexB, AnnexC, PeriodScores};
use crate::scoring::{AcademicPeriod, Track};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexAResponse {
    pub evaluatee: UserSummary,
    pub track: Track,
    pub report: AnnexA,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexBResponse {
    pub evaluatee: UserSummary,
    pub report: AnnexB,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexCResponse {
    pub evaluatee: UserSummary,
    pub track: Track,
    pub report: AnnexC,
}

// 签字人
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct Signatory {
    /// 例如 "Program Chair"
    pub title: String,
    pub name: Option<String>,
    pub position: Option<String>,
}

// Annex D：确认表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexDResponse {
    pub evaluatee: UserSummary,
    pub college_name: Option<String>,
    pub program_name: Option<String>,
    pub period: AcademicPeriod,
    pub scores: PeriodScores,
    pub signatories: Vec<Signatory>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ResultRow {
    pub evaluatee: UserSummary,
    pub scores: PeriodScores,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ResultsResponse {
    pub period: AcademicPeriod,
    pub items: Vec<ResultRow>,
    pub pagination: PaginationInfo,
}
