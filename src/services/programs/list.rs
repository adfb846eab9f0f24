use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgramService;
use crate::models::{ApiResponse, programs::requests::ProgramListParams};

pub async fn list_programs(
    service: &ProgramService,
    params: ProgramListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_programs_with_pagination(params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Program list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::storage_failure_response(
            &e,
            "Failed to retrieve program list",
        )),
    }
}
