use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::evaluations::responses::RubricResponse;
use crate::scoring::RubricVersion;

pub async fn get_rubric(version: RubricVersion) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RubricResponse::for_version(version),
        "Rubric retrieved successfully",
    )))
}

pub async fn list_rubrics() -> ActixResult<HttpResponse> {
    let rubrics: Vec<RubricResponse> = [RubricVersion::Old, RubricVersion::New]
        .into_iter()
        .map(RubricResponse::for_version)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        rubrics,
        "Rubrics retrieved successfully",
    )))
}
