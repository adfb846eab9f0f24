use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_response};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(crate::services::storage_failure_response(
                &e,
                "Failed to get user information",
            ));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        user_response(&storage, user).await,
        "User information retrieved successfully",
    )))
}
