use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::errors::FacultyEvalError;
use crate::middlewares::SessionContext;
use crate::models::evaluation_codes::entities::{AssignmentStatus, EvaluationCode};
use crate::models::evaluations::requests::{NewEvaluation, SubmitEvaluationRequest};
use crate::models::evaluations::responses::EvaluationDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::submission::{score_evaluation, validate_ratings};
use crate::scoring::{RatingInput, SubmissionError};
use crate::services::reports::cache::invalidate_reports;
use crate::services::storage_failure_response;

const MAX_COMMENT_CHARS: usize = 2000;

fn bad_request(code: ErrorCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

fn already_evaluated() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::AlreadyEvaluated,
        "This assignment has already been evaluated",
    ))
}

/// 空白评语视为未填写
pub(crate) fn normalize_comments(comments: Option<String>) -> Result<Option<String>, HttpResponse> {
    let Some(comments) = comments else {
        return Ok(None);
    };
    let trimmed = comments.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            format!("Comments must be at most {MAX_COMMENT_CHARS} characters"),
        ));
    }
    Ok(Some(trimmed.to_string()))
}

/// 校验评分并计算分值，得到待写入的评教
pub(crate) fn build_new_evaluation(
    session: &SessionContext,
    assignment_id: i64,
    code: &EvaluationCode,
    ratings: Vec<RatingInput>,
    comments: Option<String>,
) -> Result<NewEvaluation, HttpResponse> {
    let sheet = validate_ratings(code.rubric_version, &ratings).map_err(|e| match e {
        SubmissionError::Incomplete { .. } => bad_request(ErrorCode::RatingIncomplete, e.to_string()),
        _ => bad_request(ErrorCode::RatingInvalid, e.to_string()),
    })?;
    let comments = normalize_comments(comments)?;

    Ok(NewEvaluation {
        assignment_id,
        evaluator_id: session.user_id(),
        evaluatee_id: code.evaluatee_id,
        evaluator_role: code.evaluator_role,
        subject_id: code.subject_id,
        section: code.section.clone(),
        school_year: code.school_year.clone(),
        semester: code.semester,
        rubric_version: code.rubric_version,
        scores: score_evaluation(code.rubric_version, &sheet),
        comments,
        evaluator_name: session.full_name().to_string(),
        evaluator_position: session.position().to_string(),
        ratings,
    })
}

pub async fn submit_evaluation(
    service: &EvaluationService,
    session: SessionContext,
    req: SubmitEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let assignment = match storage.get_assignment_by_id(req.assignment_id).await {
        Ok(Some(a)) if a.evaluator_id == session.user_id() => a,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Evaluation assignment not found",
            )));
        }
        Err(e) => return Ok(storage_failure_response(&e, "Failed to get assignment")),
    };
    if assignment.status == AssignmentStatus::Completed {
        return Ok(already_evaluated());
    }

    let code = match storage.get_evaluation_code_by_id(assignment.code_id).await {
        Ok(Some(code)) => code,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationCodeNotFound,
                "Evaluation code not found",
            )));
        }
        Err(e) => return Ok(storage_failure_response(&e, "Failed to get evaluation code")),
    };
    if !code.is_active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationCodeInactive,
            "This evaluation code has been revoked",
        )));
    }

    let new_evaluation =
        match build_new_evaluation(&session, assignment.id, &code, req.ratings, req.comments) {
            Ok(evaluation) => evaluation,
            Err(response) => return Ok(response),
        };

    let evaluation = match storage.submit_evaluation(new_evaluation).await {
        Ok(evaluation) => evaluation,
        Err(FacultyEvalError::Conflict(_)) => return Ok(already_evaluated()),
        Err(e) => {
            tracing::error!("Failed to submit evaluation: {}", e.format_simple());
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EvaluationSubmitFailed,
                    "Failed to submit evaluation",
                )),
            );
        }
    };

    invalidate_reports(request, evaluation.evaluatee_id).await;

    tracing::info!(
        "Evaluation {} submitted by {} for evaluatee {}",
        evaluation.id,
        session.user_id(),
        evaluation.evaluatee_id
    );

    let ratings = storage
        .get_evaluation_ratings(evaluation.id)
        .await
        .unwrap_or_default();
    Ok(HttpResponse::Created().json(ApiResponse::success(
        EvaluationDetailResponse {
            evaluation,
            ratings,
        },
        "Evaluation submitted",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::scoring::{CategoryCode, RubricVersion, Score, Semester};

    fn session() -> SessionContext {
        let now = chrono::Utc::now();
        SessionContext::new(User {
            id: 7,
            username: "dean".to_string(),
            email: "dean@example.edu".to_string(),
            password_hash: String::new(),
            role: UserRole::Dean,
            status: UserStatus::Active,
            full_name: "Dean Reyes".to_string(),
            position: "Dean".to_string(),
            college_id: Some(1),
            program_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn code(version: RubricVersion) -> EvaluationCode {
        EvaluationCode {
            id: 3,
            code: "QWE-482".to_string(),
            evaluator_role: UserRole::Dean,
            evaluatee_id: 11,
            subject_id: None,
            section: None,
            school_year: "2024-2025".to_string(),
            semester: Semester::Second,
            rubric_version: version,
            issued_by: 1,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn ratings(version: RubricVersion, value: u8) -> Vec<RatingInput> {
        version
            .categories()
            .iter()
            .flat_map(|c| {
                (0..c.indicators.len()).map(move |index| RatingInput {
                    category: c.code,
                    index,
                    value,
                })
            })
            .collect()
    }

    #[test]
    fn test_build_new_evaluation_scores_and_snapshots() {
        let evaluation = build_new_evaluation(
            &session(),
            42,
            &code(RubricVersion::New),
            ratings(RubricVersion::New, 5),
            Some("  Very organized.  ".to_string()),
        )
        .unwrap();

        assert_eq!(evaluation.assignment_id, 42);
        assert_eq!(evaluation.evaluatee_id, 11);
        assert_eq!(evaluation.evaluator_name, "Dean Reyes");
        assert_eq!(evaluation.scores.total, Score::Value(5.0));
        assert_eq!(evaluation.comments.as_deref(), Some("Very organized."));
        assert_eq!(evaluation.ratings.len(), 22);
    }

    #[test]
    fn test_build_new_evaluation_rejects_bad_sheets() {
        // old 量表的评分不满足 new 评教码
        let response = build_new_evaluation(
            &session(),
            1,
            &code(RubricVersion::New),
            ratings(RubricVersion::Old, 4),
            None,
        )
        .unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let mut out_of_range = ratings(RubricVersion::Old, 4);
        out_of_range[0] = RatingInput {
            category: CategoryCode::A,
            index: 0,
            value: 6,
        };
        assert!(
            build_new_evaluation(&session(), 1, &code(RubricVersion::Old), out_of_range, None)
                .is_err()
        );
    }

    #[test]
    fn test_blank_comments_dropped() {
        assert_eq!(normalize_comments(Some("   ".to_string())).unwrap(), None);
        assert!(normalize_comments(Some("x".repeat(MAX_COMMENT_CHARS + 1))).is_err());
    }
}
