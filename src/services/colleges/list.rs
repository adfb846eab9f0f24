use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CollegeService;
use crate::models::{ApiResponse, colleges::requests::CollegeListParams};

pub async fn list_colleges(
    service: &CollegeService,
    params: CollegeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_colleges_with_pagination(params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "College list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::storage_failure_response(
            &e,
            "Failed to retrieve college list",
        )),
    }
}
