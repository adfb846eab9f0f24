use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::SessionContext;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::users::requests::{EvaluateeListParams, UserListQuery};
use crate::models::{ApiResponse, ErrorCode};

/// 按发放范围构造查询：管理员全部，院长本学院，系主任本专业
pub(crate) fn evaluatee_query(
    session: &SessionContext,
    params: EvaluateeListParams,
) -> Option<UserListQuery> {
    let mut query = UserListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        status: Some(UserStatus::Active),
        search: params.search,
        evaluatees_only: true,
        ..Default::default()
    };

    match session.role() {
        UserRole::Admin => {}
        UserRole::Dean => query.college_id = Some(session.college_id()?),
        UserRole::DepartmentChair => query.program_id = Some(session.program_id()?),
        _ => return None,
    }
    Some(query)
}

pub async fn list_evaluatees(
    service: &UserService,
    session: SessionContext,
    params: EvaluateeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(query) = evaluatee_query(&session, params) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "No college or program assigned to issue evaluation codes for",
        )));
    };

    let storage = service.get_storage(request)?;

    match storage.list_users_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluatee list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::storage_failure_response(
            &e,
            "Failed to retrieve evaluatee list",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::models::users::entities::User;

    fn session(role: UserRole, college_id: Option<i64>, program_id: Option<i64>) -> SessionContext {
        let now = chrono::Utc::now();
        SessionContext::new(User {
            id: 7,
            username: "issuer".to_string(),
            email: "issuer@example.edu".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: "Issuer".to_string(),
            position: "Dean".to_string(),
            college_id,
            program_id,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn params() -> EvaluateeListParams {
        EvaluateeListParams {
            pagination: PaginationQuery { page: 1, size: 20 },
            search: Some("reyes".to_string()),
        }
    }

    #[test]
    fn test_evaluatee_query_follows_issue_scope() {
        let admin = evaluatee_query(&session(UserRole::Admin, None, None), params()).unwrap();
        assert!(admin.evaluatees_only);
        assert_eq!(admin.college_id, None);
        assert_eq!(admin.search.as_deref(), Some("reyes"));

        let dean = evaluatee_query(&session(UserRole::Dean, Some(3), None), params()).unwrap();
        assert_eq!(dean.college_id, Some(3));
        assert_eq!(dean.program_id, None);

        let chair =
            evaluatee_query(&session(UserRole::DepartmentChair, Some(3), Some(9)), params())
                .unwrap();
        assert_eq!(chair.program_id, Some(9));
        assert_eq!(chair.college_id, None);

        assert!(evaluatee_query(&session(UserRole::Dean, None, None), params()).is_none());
        assert!(evaluatee_query(&session(UserRole::Faculty, Some(3), None), params()).is_none());
    }
}
