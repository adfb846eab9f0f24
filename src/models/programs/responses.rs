use super::entities::Program;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/program.ts")]
pub struct ProgramListResponse {
    pub items: Vec<Program>,
    pub pagination: PaginationInfo,
}
