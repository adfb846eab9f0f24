use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationCodeService;
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;
use crate::models::evaluation_codes::requests::{
    EvaluationCodeListParams, EvaluationCodeListQuery,
};

/// 管理员查看全部，系主任与院长只看自己发放的评教码
pub async fn list_codes(
    service: &EvaluationCodeService,
    session: SessionContext,
    params: EvaluationCodeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let query = EvaluationCodeListQuery {
        page: params.pagination.page,
        size: params.pagination.size,
        evaluatee_id: params.evaluatee_id,
        issued_by: (!session.is_admin()).then(|| session.user_id()),
        school_year: params.school_year.clone(),
        semester: params.semester,
        evaluator_role: params.evaluator_role,
        is_active: params.active_filter(),
    };

    match storage.list_evaluation_codes_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluation codes retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::storage_failure_response(
            &e,
            "Failed to retrieve evaluation codes",
        )),
    }
}
