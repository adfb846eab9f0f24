use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::middlewares::{ReportScope, SessionContext};
use crate::models::reports::requests::ResultsParams;
use crate::models::reports::responses::{ResultRow, ResultsResponse};
use crate::models::users::entities::{User, UserSummary};
use crate::models::users::requests::UserListQuery;
use crate::models::{ApiResponse, ErrorCode, PaginationInfo};
use crate::scoring::AcademicPeriod;
use crate::scoring::annex::period_scores;
use crate::scoring::period::parse_school_year;
use crate::services::storage_failure_response;

/// 结果列表的被评人查询；`None` 表示只能看到自己
pub(crate) fn scoped_evaluatee_query(
    session: &SessionContext,
    params: &ResultsParams,
) -> Option<UserListQuery> {
    let mut query = UserListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        college_id: params.college_id,
        program_id: params.program_id,
        search: params.search.clone(),
        evaluatees_only: true,
        ..Default::default()
    };
    match session.report_scope() {
        ReportScope::All => {}
        ReportScope::College(college_id) => query.college_id = Some(college_id),
        ReportScope::Program(program_id) => query.program_id = Some(program_id),
        ReportScope::OwnOnly | ReportScope::None => return None,
    }
    Some(query)
}

pub async fn list_results(
    service: &ReportService,
    session: SessionContext,
    params: ResultsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if matches!(session.report_scope(), ReportScope::None) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ReportScopeDenied,
            "You are not allowed to view evaluation results",
        )));
    }
    let school_year = params.school_year.trim();
    if let Err(msg) = parse_school_year(school_year) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidPeriod, msg)));
    }
    let period = AcademicPeriod::new(school_year, params.semester);

    let storage = service.get_storage(request)?;

    let (evaluatees, pagination): (Vec<User>, PaginationInfo) =
        match scoped_evaluatee_query(&session, &params) {
            Some(query) => match storage.list_users_with_pagination(query).await {
                Ok(page) => (page.items, page.pagination),
                Err(e) => return Ok(storage_failure_response(&e, "Failed to list evaluatees")),
            },
            None => (
                vec![session.user().clone()],
                PaginationInfo {
                    page: 1,
                    page_size: 1,
                    total: 1,
                    total_pages: 1,
                },
            ),
        };

    let ids: Vec<i64> = evaluatees.iter().map(|u| u.id).collect();
    let mut records = match storage
        .list_evaluation_records_for_evaluatees(&ids, &period)
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(storage_failure_response(&e, "Failed to load evaluations")),
    };

    let items = evaluatees
        .iter()
        .map(|user| {
            let user_records = records.remove(&user.id).unwrap_or_default();
            ResultRow {
                evaluatee: UserSummary::from(user),
                scores: period_scores(&user_records, &period, user.track()),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ResultsResponse {
            period,
            items,
            pagination,
        },
        "Results retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::scoring::Semester;

    fn session(role: UserRole, college_id: Option<i64>, program_id: Option<i64>) -> SessionContext {
        let now = chrono::Utc::now();
        SessionContext::new(User {
            id: 1,
            username: "viewer".to_string(),
            email: "viewer@example.edu".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: "Viewer".to_string(),
            position: "Dean".to_string(),
            college_id,
            program_id,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn params() -> ResultsParams {
        ResultsParams {
            pagination: PaginationQuery { page: 1, size: 20 },
            school_year: "2024-2025".to_string(),
            semester: Semester::First,
            college_id: Some(9),
            program_id: None,
            search: None,
        }
    }

    #[test]
    fn test_results_scope() {
        let dean = scoped_evaluatee_query(&session(UserRole::Dean, Some(2), None), &params()).unwrap();
        // 院长不能越过自己的学院
        assert_eq!(dean.college_id, Some(2));
        assert!(dean.evaluatees_only);

        let vpaa = scoped_evaluatee_query(&session(UserRole::Vpaa, None, None), &params()).unwrap();
        assert_eq!(vpaa.college_id, Some(9));

        assert!(scoped_evaluatee_query(&session(UserRole::Faculty, Some(2), None), &params()).is_none());
    }
}
