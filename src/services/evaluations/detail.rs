use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use super::list::anonymize_for;
use crate::middlewares::SessionContext;
use crate::models::evaluations::responses::EvaluationDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure_response;

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::EvaluationNotFound,
        "Evaluation not found",
    ))
}

pub async fn get_evaluation(
    service: &EvaluationService,
    session: SessionContext,
    evaluation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut evaluation = match storage.get_evaluation_by_id(evaluation_id).await {
        Ok(Some(evaluation)) => evaluation,
        Ok(None) => return Ok(not_found()),
        Err(e) => return Ok(storage_failure_response(&e, "Failed to get evaluation")),
    };

    if evaluation.evaluator_id != Some(session.user_id()) {
        let visible = match storage.get_user_by_id(evaluation.evaluatee_id).await {
            Ok(Some(evaluatee)) => session.can_view_reports_of(&evaluatee),
            Ok(None) => session.is_admin(),
            Err(e) => return Ok(storage_failure_response(&e, "Failed to get evaluatee")),
        };
        // 无权查看时与不存在一致
        if !visible {
            return Ok(not_found());
        }
    }

    let ratings = match storage.get_evaluation_ratings(evaluation.id).await {
        Ok(ratings) => ratings,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to get ratings")),
    };
    anonymize_for(&session, &mut evaluation);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EvaluationDetailResponse {
            evaluation,
            ratings,
        },
        "Evaluation retrieved successfully",
    )))
}
