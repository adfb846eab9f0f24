use super::entities::College;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/college.ts")]
pub struct CollegeListResponse {
    pub items: Vec<College>,
    pub pagination: PaginationInfo,
}
