use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationCodeService;
use crate::middlewares::SessionContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure_response;

pub async fn revoke_code(
    service: &EvaluationCodeService,
    session: SessionContext,
    code_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let code = match storage.get_evaluation_code_by_id(code_id).await {
        Ok(Some(code)) => code,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationCodeNotFound,
                "Evaluation code not found",
            )));
        }
        Err(e) => return Ok(storage_failure_response(&e, "Failed to get evaluation code")),
    };

    // 发放人本人或对被评人有管理范围的用户
    let allowed = if code.issued_by == session.user_id() || session.is_admin() {
        true
    } else {
        match storage.get_user_by_id(code.evaluatee_id).await {
            Ok(Some(evaluatee)) => session.can_issue_for(&evaluatee),
            Ok(None) => false,
            Err(e) => return Ok(storage_failure_response(&e, "Failed to get evaluatee")),
        }
    };
    if !allowed {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You cannot revoke this evaluation code",
        )));
    }

    match storage.set_evaluation_code_active(code_id, false).await {
        Ok(Some(code)) => {
            tracing::info!("Evaluation code {} revoked by {}", code.code, session.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::success(code, "Evaluation code revoked")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationCodeNotFound,
            "Evaluation code not found",
        ))),
        Err(e) => Ok(storage_failure_response(&e, "Failed to revoke evaluation code")),
    }
}
