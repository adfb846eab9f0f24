//! 会话上下文提取器
//!
//! 由 [`RequireJWT`](super::RequireJWT) 写入请求扩展的用户构建，
//! 集中处理报表可见范围与评教码发放范围。

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::auth::responses::SessionInfo;
use crate::models::users::entities::{User, UserRole};
use crate::scoring::{Track, is_supervisor_only};

/// 报表可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    College(i64),
    Program(i64),
    /// 只能查看自己的报表
    OwnOnly,
    None,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    user: User,
}

impl SessionContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn full_name(&self) -> &str {
        &self.user.full_name
    }

    pub fn position(&self) -> &str {
        &self.user.position
    }

    pub fn college_id(&self) -> Option<i64> {
        self.user.college_id
    }

    pub fn program_id(&self) -> Option<i64> {
        self.user.program_id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }

    pub fn supervisor_only(&self) -> bool {
        is_supervisor_only(&self.user.position)
    }

    pub fn track(&self) -> Track {
        self.user.track()
    }

    pub fn report_scope(&self) -> ReportScope {
        match self.user.role {
            UserRole::Admin | UserRole::Vpaa | UserRole::President => ReportScope::All,
            UserRole::Dean => self
                .user
                .college_id
                .map_or(ReportScope::OwnOnly, ReportScope::College),
            UserRole::DepartmentChair => self
                .user
                .program_id
                .map_or(ReportScope::OwnOnly, ReportScope::Program),
            UserRole::Faculty => ReportScope::OwnOnly,
            UserRole::Student => ReportScope::None,
        }
    }

    /// 是否可以查看某位被评人的报表
    pub fn can_view_reports_of(&self, evaluatee: &User) -> bool {
        match self.report_scope() {
            ReportScope::None => false,
            _ if evaluatee.id == self.user.id => true,
            ReportScope::All => true,
            ReportScope::College(id) => evaluatee.college_id == Some(id),
            ReportScope::Program(id) => evaluatee.program_id == Some(id),
            ReportScope::OwnOnly => false,
        }
    }

    /// 是否可以为该被评人发放或停用评教码
    pub fn can_issue_for(&self, evaluatee: &User) -> bool {
        match self.user.role {
            UserRole::Admin => true,
            UserRole::Dean => {
                self.user.college_id.is_some() && evaluatee.college_id == self.user.college_id
            }
            UserRole::DepartmentChair => {
                self.user.program_id.is_some() && evaluatee.program_id == self.user.program_id
            }
            _ => false,
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            user_id: self.user.id,
            role: self.user.role,
            full_name: self.user.full_name.clone(),
            position: self.user.position.clone(),
            college_id: self.user.college_id,
            program_id: self.user.program_id,
            supervisor_only: self.supervisor_only(),
            track: self.track(),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<User>()
            .cloned()
            .map(SessionContext::new)
            .ok_or_else(|| {
                InternalError::from_response(
                    "missing session",
                    create_error_response(
                        actix_web::http::StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    ),
                )
                .into()
            });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use actix_web::test::TestRequest;

    fn user(id: i64, role: UserRole, college_id: Option<i64>, program_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.edu"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: format!("User {id}"),
            position: "Instructor I".to_string(),
            college_id,
            program_id,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_report_scope_by_role() {
        let faculty_ccs = user(10, UserRole::Faculty, Some(1), Some(11));
        let faculty_cba = user(11, UserRole::Faculty, Some(2), Some(21));

        let dean = SessionContext::new(user(1, UserRole::Dean, Some(1), None));
        assert_eq!(dean.report_scope(), ReportScope::College(1));
        assert!(dean.can_view_reports_of(&faculty_ccs));
        assert!(!dean.can_view_reports_of(&faculty_cba));

        let chair = SessionContext::new(user(2, UserRole::DepartmentChair, Some(1), Some(11)));
        assert!(chair.can_view_reports_of(&faculty_ccs));
        assert!(!chair.can_view_reports_of(&faculty_cba));

        let vpaa = SessionContext::new(user(3, UserRole::Vpaa, None, None));
        assert!(vpaa.can_view_reports_of(&faculty_cba));
        assert!(!vpaa.can_issue_for(&faculty_cba));

        let own = SessionContext::new(faculty_ccs.clone());
        assert!(own.can_view_reports_of(&faculty_ccs));
        assert!(!own.can_view_reports_of(&faculty_cba));

        let student = SessionContext::new(user(4, UserRole::Student, Some(1), Some(11)));
        assert_eq!(student.report_scope(), ReportScope::None);
        assert!(!student.can_view_reports_of(&faculty_ccs));
    }

    #[test]
    fn test_issue_scope() {
        let evaluatee = user(10, UserRole::Faculty, Some(1), Some(11));
        assert!(SessionContext::new(user(1, UserRole::Admin, None, None)).can_issue_for(&evaluatee));
        assert!(SessionContext::new(user(2, UserRole::Dean, Some(1), None)).can_issue_for(&evaluatee));
        assert!(!SessionContext::new(user(3, UserRole::Dean, None, None)).can_issue_for(&evaluatee));
        assert!(
            !SessionContext::new(user(4, UserRole::DepartmentChair, Some(1), Some(12)))
                .can_issue_for(&evaluatee)
        );
    }

    #[actix_web::test]
    async fn test_extractor_requires_user() {
        let req = TestRequest::default().to_http_request();
        assert!(SessionContext::extract(&req).await.is_err());

        let req = TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert(user(7, UserRole::Faculty, None, None));
        let session = SessionContext::extract(&req).await.unwrap();
        assert_eq!(session.user_id(), 7);
        assert!(!session.supervisor_only());
    }
}
