use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::middlewares::{ReportScope, SessionContext};
use crate::models::ApiResponse;
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::{EvaluationListParams, EvaluationListQuery};
use crate::models::users::entities::UserRole;

/// 学生评价对被评人及其上级匿名：姓名、职务与可追溯到评价人的 ID 一并清除
pub(crate) fn anonymize_for(session: &SessionContext, evaluation: &mut Evaluation) {
    if evaluation.evaluator_role == UserRole::Student
        && evaluation.evaluator_id != Some(session.user_id())
        && !session.is_admin()
    {
        evaluation.evaluator_name = "Anonymous".to_string();
        evaluation.evaluator_position = UserRole::Student.label().to_string();
        evaluation.evaluator_id = None;
        evaluation.assignment_id = None;
    }
}

/// 按会话范围收窄查询条件
pub(crate) fn scoped_query(session: &SessionContext, params: &EvaluationListParams) -> EvaluationListQuery {
    let mut query = EvaluationListQuery {
        page: params.pagination.page,
        size: params.pagination.size,
        evaluatee_id: params.evaluatee_id,
        school_year: params.school_year.clone(),
        semester: params.semester,
        evaluator_role: params.evaluator_role,
        ..Default::default()
    };
    match session.report_scope() {
        ReportScope::All => {}
        ReportScope::College(college_id) => query.college_id = Some(college_id),
        ReportScope::Program(program_id) => query.program_id = Some(program_id),
        ReportScope::OwnOnly => query.evaluatee_id = Some(session.user_id()),
        // 学生只能看到自己提交的评教
        ReportScope::None => query.evaluator_id = Some(session.user_id()),
    }
    query
}

pub async fn list_evaluations(
    service: &EvaluationService,
    session: SessionContext,
    params: EvaluationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query = scoped_query(&session, &params);

    match storage.list_evaluations_with_pagination(query).await {
        Ok(mut response) => {
            for evaluation in response.items.iter_mut() {
                anonymize_for(&session, evaluation);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Evaluations retrieved successfully",
            )))
        }
        Err(e) => Ok(crate::services::storage_failure_response(
            &e,
            "Failed to retrieve evaluations",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::models::users::entities::{User, UserStatus};
    use crate::scoring::{RubricVersion, Score, Semester};

    fn session(role: UserRole, college_id: Option<i64>, program_id: Option<i64>) -> SessionContext {
        let now = chrono::Utc::now();
        SessionContext::new(User {
            id: 20,
            username: "viewer".to_string(),
            email: "viewer@example.edu".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: "Viewer".to_string(),
            position: "Instructor I".to_string(),
            college_id,
            program_id,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn params() -> EvaluationListParams {
        EvaluationListParams {
            pagination: PaginationQuery { page: 2, size: 5 },
            evaluatee_id: Some(99),
            school_year: None,
            semester: None,
            evaluator_role: None,
        }
    }

    #[test]
    fn test_query_scoped_by_role() {
        let dean = scoped_query(&session(UserRole::Dean, Some(3), None), &params());
        assert_eq!(dean.college_id, Some(3));
        assert_eq!(dean.evaluatee_id, Some(99));
        assert_eq!(dean.page, 2);

        let faculty = scoped_query(&session(UserRole::Faculty, Some(3), Some(4)), &params());
        assert_eq!(faculty.evaluatee_id, Some(20));

        let student = scoped_query(&session(UserRole::Student, None, None), &params());
        assert_eq!(student.evaluator_id, Some(20));

        let admin = scoped_query(&session(UserRole::Admin, None, None), &params());
        assert_eq!(admin.college_id, None);
        assert_eq!(admin.evaluator_id, None);
    }

    fn student_evaluation(evaluator_id: i64) -> Evaluation {
        let now = chrono::Utc::now();
        Evaluation {
            id: 1,
            assignment_id: Some(31),
            evaluator_id: Some(evaluator_id),
            evaluatee_id: 20,
            evaluator_role: UserRole::Student,
            subject_id: Some(5),
            section: Some("BSIT 3-A".to_string()),
            school_year: "2024-2025".to_string(),
            semester: Semester::First,
            rubric_version: RubricVersion::New,
            score_commitment: Score::Value(4.5),
            score_knowledge: Score::Value(4.0),
            score_teaching: Score::Value(4.0),
            score_management: Score::Value(3.5),
            total_score: Score::Value(4.0),
            comments: Some("Clear lectures".to_string()),
            evaluator_name: "Juan Dela Cruz".to_string(),
            evaluator_position: "Student".to_string(),
            evaluation_date: now,
            created_at: now,
        }
    }

    #[test]
    fn test_anonymized_row_hides_evaluator_identity() {
        let mut evaluation = student_evaluation(55);
        anonymize_for(&session(UserRole::Faculty, Some(3), Some(4)), &mut evaluation);

        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["evaluator_name"], "Anonymous");
        assert!(json.get("evaluator_id").is_none());
        assert!(json.get("assignment_id").is_none());
        assert!(!json.to_string().contains("Juan"));
    }

    #[test]
    fn test_evaluator_and_admin_see_identity() {
        let mut own = student_evaluation(20);
        anonymize_for(&session(UserRole::Student, None, None), &mut own);
        assert_eq!(own.evaluator_id, Some(20));
        assert_eq!(own.evaluator_name, "Juan Dela Cruz");

        let mut admin_view = student_evaluation(55);
        anonymize_for(&session(UserRole::Admin, None, None), &mut admin_view);
        assert_eq!(admin_view.evaluator_id, Some(55));
        assert_eq!(admin_view.assignment_id, Some(31));
    }
}
