use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;
use crate::models::evaluation_codes::responses::PendingAssignmentListResponse;

pub async fn list_pending(
    service: &EvaluationService,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_pending_assignments(session.user_id()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PendingAssignmentListResponse { items },
            "Pending evaluations retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::storage_failure_response(
            &e,
            "Failed to retrieve pending evaluations",
        )),
    }
}
