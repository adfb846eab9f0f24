use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::EvaluationCodeService;
use crate::errors::FacultyEvalError;
use crate::middlewares::SessionContext;
use crate::models::evaluation_codes::{
    requests::{IssueEvaluationCodeRequest, NewEvaluationCode},
    responses::EvaluationCodeResponse,
};
use crate::models::users::entities::{User, UserRole, UserSummary};
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::period::parse_school_year;
use crate::scoring::{Component, RubricVersion};
use crate::services::storage_failure_response;
use crate::storage::Storage;
use crate::utils::validate::validate_section;

fn bad_request(code: ErrorCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

/// 请求本身的校验，不访问存储
pub(crate) fn validate_issue_request(req: &IssueEvaluationCodeRequest) -> Result<(), HttpResponse> {
    if !req.evaluator_role.can_evaluate() {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            format!(
                "Evaluator role must be student or a supervisor role, got {}",
                req.evaluator_role
            ),
        ));
    }
    if let Err(msg) = parse_school_year(req.school_year.trim()) {
        return Err(bad_request(ErrorCode::InvalidPeriod, msg));
    }
    if req.evaluator_role == UserRole::Student
        && (req.subject_id.is_none() || req.section.as_deref().is_none_or(|s| s.trim().is_empty()))
    {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            "Student evaluation codes require a subject and a section",
        ));
    }
    if let Some(ref section) = req.section
        && let Err(msg) = validate_section(section)
    {
        return Err(bad_request(ErrorCode::ValidationFailed, msg));
    }
    Ok(())
}

/// 仅上级评价的被评人（院长、VPAA 等）不接受学生评价
pub(crate) fn check_evaluator_fits(
    evaluator_role: UserRole,
    evaluatee: &User,
) -> Result<(), HttpResponse> {
    if evaluator_role == UserRole::Student && !evaluatee.track().includes(Component::Student) {
        return Err(bad_request(
            ErrorCode::InvalidEvaluatee,
            format!(
                "{} is evaluated by supervisors only, student codes cannot be issued",
                evaluatee.full_name
            ),
        ));
    }
    Ok(())
}

async fn load_evaluatee(storage: &Arc<dyn Storage>, id: i64) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(id).await {
        Ok(Some(user)) if matches!(user.role, UserRole::Student | UserRole::Admin) => {
            Err(bad_request(
                ErrorCode::InvalidEvaluatee,
                "Evaluation codes can only be issued for faculty members",
            ))
        }
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::InvalidEvaluatee,
            "Evaluatee not found",
        ))),
        Err(e) => Err(storage_failure_response(&e, "Failed to get evaluatee")),
    }
}

pub async fn issue_code(
    service: &EvaluationCodeService,
    session: SessionContext,
    req: IssueEvaluationCodeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_issue_request(&req) {
        return Ok(response);
    }

    let storage = service.get_storage(request)?;
    let evaluatee = match load_evaluatee(&storage, req.evaluatee_id).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if let Err(response) = check_evaluator_fits(req.evaluator_role, &evaluatee) {
        return Ok(response);
    }

    if !session.can_issue_for(&evaluatee) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only issue codes for faculty in your college or program",
        )));
    }

    if let Some(subject_id) = req.subject_id {
        match storage.get_subject_by_id(subject_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SubjectNotFound,
                    "Subject not found",
                )));
            }
            Err(e) => return Ok(storage_failure_response(&e, "Failed to get subject")),
        }
    }

    let config = service.get_config();
    let rubric_version = req.rubric_version.unwrap_or_else(|| {
        config
            .evaluation
            .default_rubric_version
            .parse::<RubricVersion>()
            .unwrap_or(RubricVersion::New)
    });

    let new_code = NewEvaluationCode {
        evaluator_role: req.evaluator_role,
        evaluatee_id: evaluatee.id,
        subject_id: req.subject_id,
        section: req.section.map(|s| s.trim().to_string()),
        school_year: req.school_year.trim().to_string(),
        semester: req.semester,
        rubric_version,
        issued_by: session.user_id(),
    };

    match storage
        .issue_evaluation_code(new_code, config.evaluation.code_max_attempts)
        .await
    {
        Ok(code) => {
            tracing::info!(
                "Evaluation code {} issued by {} for evaluatee {}",
                code.code,
                session.user_id(),
                evaluatee.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                EvaluationCodeResponse {
                    code,
                    evaluatee: UserSummary::from(&evaluatee),
                },
                "Evaluation code issued",
            )))
        }
        Err(FacultyEvalError::CodeGeneration(msg)) => {
            tracing::error!("{}", msg);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EvaluationCodeGenerationFailed,
                    msg,
                )),
            )
        }
        Err(e) => Ok(crate::services::write_failure_response(
            &e,
            ErrorCode::Conflict,
            "Evaluation code could not be stored",
            ErrorCode::InternalServerError,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use crate::scoring::Semester;

    fn evaluatee(position: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id: 5,
            username: "evaluatee".to_string(),
            email: "evaluatee@example.edu".to_string(),
            password_hash: String::new(),
            role: UserRole::Dean,
            status: UserStatus::Active,
            full_name: "Ana Cruz".to_string(),
            position: position.to_string(),
            college_id: Some(1),
            program_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(role: UserRole) -> IssueEvaluationCodeRequest {
        IssueEvaluationCodeRequest {
            evaluator_role: role,
            evaluatee_id: 5,
            subject_id: Some(3),
            section: Some("BSIT 2A".to_string()),
            school_year: "2024-2025".to_string(),
            semester: Semester::First,
            rubric_version: None,
        }
    }

    #[test]
    fn test_issue_validation() {
        assert!(validate_issue_request(&request(UserRole::Student)).is_ok());
        assert!(validate_issue_request(&request(UserRole::Dean)).is_ok());
        assert!(validate_issue_request(&request(UserRole::Faculty)).is_err());

        let mut bad_year = request(UserRole::Student);
        bad_year.school_year = "2024-2026".to_string();
        assert!(validate_issue_request(&bad_year).is_err());

        // 两端空白与存储时的取值一致
        let mut padded_year = request(UserRole::Student);
        padded_year.school_year = " 2024-2025 ".to_string();
        assert!(validate_issue_request(&padded_year).is_ok());

        let mut no_section = request(UserRole::Student);
        no_section.section = None;
        assert!(validate_issue_request(&no_section).is_err());

        // 上级评价不需要课程与班级
        let mut supervisor = request(UserRole::Vpaa);
        supervisor.subject_id = None;
        supervisor.section = None;
        assert!(validate_issue_request(&supervisor).is_ok());
    }

    #[test]
    fn test_student_codes_rejected_for_supervisor_only_evaluatee() {
        let dean = evaluatee("Dean, College of Engineering");
        let response = check_evaluator_fits(UserRole::Student, &dean).unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert!(check_evaluator_fits(UserRole::Vpaa, &dean).is_ok());

        let instructor = evaluatee("Instructor I");
        assert!(check_evaluator_fits(UserRole::Student, &instructor).is_ok());
        assert!(check_evaluator_fits(UserRole::DepartmentChair, &instructor).is_ok());
    }
}
