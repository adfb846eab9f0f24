use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::SessionContext;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_user(
    service: &UserService,
    session: SessionContext,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if user_id == session.user_id() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.delete_user(user_id).await {
        Ok(true) => {
            tracing::info!("User {} deleted by {}", user_id, session.user_id());
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(crate::services::write_failure_response(
            &e,
            ErrorCode::Conflict,
            "User is still referenced by evaluations",
            ErrorCode::UserDeleteFailed,
        )),
    }
}
