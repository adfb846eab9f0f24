use serde::Serialize;
use ts_rs::TS;

use super::entities::{Evaluation, RatingDetail};
use crate::models::common::PaginationInfo;
use crate::scoring::{CategoryCode, RubricVersion};
use crate::scoring::rubric::RubricCategory;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationDetailResponse {
    pub evaluation: Evaluation,
    pub ratings: Vec<RatingDetail>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}

// 量表展示
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct RubricCategoryView {
    pub code: CategoryCode,
    pub title: String,
    pub indicators: Vec<String>,
}

impl From<&RubricCategory> for RubricCategoryView {
    fn from(category: &RubricCategory) -> Self {
        Self {
            code: category.code,
            title: category.title.to_string(),
            indicators: category.indicators.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct RubricResponse {
    pub version: RubricVersion,
    pub indicator_count: usize,
    pub categories: Vec<RubricCategoryView>,
}

impl RubricResponse {
    pub fn for_version(version: RubricVersion) -> Self {
        Self {
            version,
            indicator_count: version.indicator_count(),
            categories: version.categories().iter().map(Into::into).collect(),
        }
    }
}
