use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationCodeService;
use crate::middlewares::SessionContext;
use crate::models::evaluation_codes::entities::{AssignmentStatus, EvaluationCode};
use crate::models::evaluation_codes::requests::RedeemCodeRequest;
use crate::models::evaluation_codes::responses::RedeemCodeResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure_response;
use crate::utils::random_code::normalize_evaluation_code;

/// 评教码可被当前用户兑换的条件
pub(crate) fn check_redeemable(
    code: &EvaluationCode,
    session: &SessionContext,
) -> Result<(), HttpResponse> {
    if !code.is_active {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationCodeInactive,
            "This evaluation code is no longer active",
        )));
    }
    if code.evaluator_role != session.role() {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationCodeRoleMismatch,
            format!(
                "This code is for {} evaluators",
                code.evaluator_role.label()
            ),
        )));
    }
    if code.evaluatee_id == session.user_id() {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::SelfEvaluationNotAllowed,
            "You cannot evaluate yourself",
        )));
    }
    Ok(())
}

pub async fn redeem_code(
    service: &EvaluationCodeService,
    session: SessionContext,
    req: RedeemCodeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(normalized) = normalize_evaluation_code(&req.code) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EvaluationCodeInvalid,
            "Evaluation code must look like ABC-123",
        )));
    };

    let storage = service.get_storage(request)?;

    let code = match storage.get_evaluation_code_by_code(&normalized).await {
        Ok(Some(code)) => code,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationCodeNotFound,
                "Evaluation code not found",
            )));
        }
        Err(e) => return Ok(storage_failure_response(&e, "Failed to redeem code")),
    };

    if let Err(response) = check_redeemable(&code, &session) {
        return Ok(response);
    }

    let (assignment, created) = match storage
        .get_or_create_assignment(code.id, session.user_id())
        .await
    {
        Ok(result) => result,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to redeem code")),
    };

    if assignment.status == AssignmentStatus::Completed {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AlreadyEvaluated,
            "You have already submitted this evaluation",
        )));
    }

    let pending = match storage.get_pending_assignment(assignment.id).await {
        Ok(Some(pending)) => pending,
        // 与提交并发时任务可能刚完成
        Ok(None) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEvaluated,
                "You have already submitted this evaluation",
            )));
        }
        Err(e) => return Ok(storage_failure_response(&e, "Failed to redeem code")),
    };

    if created {
        tracing::info!(
            "User {} redeemed evaluation code {}",
            session.user_id(),
            code.code
        );
    }

    let response = RedeemCodeResponse {
        assignment,
        pending,
    };
    if created {
        Ok(HttpResponse::Created().json(ApiResponse::success(response, "Evaluation code redeemed")))
    } else {
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluation already in progress",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::scoring::{RubricVersion, Semester};

    fn session(id: i64, role: UserRole) -> SessionContext {
        let now = chrono::Utc::now();
        SessionContext::new(User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.edu"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: format!("User {id}"),
            position: "Student".to_string(),
            college_id: None,
            program_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn code(evaluator_role: UserRole, evaluatee_id: i64, is_active: bool) -> EvaluationCode {
        EvaluationCode {
            id: 1,
            code: "ABC-123".to_string(),
            evaluator_role,
            evaluatee_id,
            subject_id: None,
            section: None,
            school_year: "2024-2025".to_string(),
            semester: Semester::First,
            rubric_version: RubricVersion::New,
            issued_by: 99,
            is_active,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_redeem_rules() {
        let student = session(2, UserRole::Student);
        assert!(check_redeemable(&code(UserRole::Student, 10, true), &student).is_ok());

        let inactive = check_redeemable(&code(UserRole::Student, 10, false), &student).unwrap_err();
        assert_eq!(inactive.status(), actix_web::http::StatusCode::FORBIDDEN);

        assert!(check_redeemable(&code(UserRole::Dean, 10, true), &student).is_err());

        let dean = session(10, UserRole::Dean);
        assert!(check_redeemable(&code(UserRole::Dean, 10, true), &dean).is_err());
    }
}
