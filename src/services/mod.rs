pub mod auth;
pub mod colleges;
pub mod evaluation_codes;
pub mod evaluations;
pub mod programs;
pub mod reports;
pub mod subjects;
pub mod users;

pub use auth::AuthService;
pub use colleges::CollegeService;
pub use evaluation_codes::EvaluationCodeService;
pub use evaluations::EvaluationService;
pub use programs::ProgramService;
pub use reports::ReportService;
pub use subjects::SubjectService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::FacultyEvalError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not configured")
        })
}

/// 从 app data 中取出缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Cache not found in app data");
            actix_web::error::ErrorInternalServerError("Cache not configured")
        })
}

/// 写操作失败：约束冲突返回 409，其余返回 500
pub(crate) fn write_failure_response(
    err: &FacultyEvalError,
    conflict_code: ErrorCode,
    conflict_message: &str,
    failure_code: ErrorCode,
) -> HttpResponse {
    if matches!(err, FacultyEvalError::Conflict(_)) {
        HttpResponse::Conflict().json(ApiResponse::error_empty(conflict_code, conflict_message))
    } else {
        tracing::error!("{}", err.format_simple());
        HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(failure_code, err.message()))
    }
}

/// 读操作失败
pub(crate) fn storage_failure_response(err: &FacultyEvalError, context: &str) -> HttpResponse {
    tracing::error!("{context}: {}", err.format_simple());
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {}", err.message()),
    ))
}
