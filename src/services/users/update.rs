use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_response};
use crate::models::{ApiResponse, ErrorCode, users::requests::UpdateUserRequest};
use crate::services::reports::cache::invalidate_reports;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_display_text, validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref email) = update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    for (value, field) in [
        (&update_data.full_name, "Full name"),
        (&update_data.position, "Position"),
    ] {
        if let Some(value) = value
            && let Err(msg) = validate_display_text(value, field)
        {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Password hashing failed: {e}"),
                    )),
                );
            }
        }
    }

    let storage = service.get_storage(request)?;

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            // 职务或所属单位变化会改变评分轨道与签字人
            invalidate_reports(request, user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user_response(&storage, user).await,
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(crate::services::write_failure_response(
            &e,
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
            ErrorCode::UserUpdateFailed,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest, web};
    use std::sync::Arc;

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::users::entities::UserRole;
    use crate::services::reports::cache::ReportCache;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, fixtures};

    #[actix_web::test]
    async fn test_position_change_invalidates_cached_reports() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = fixtures::user(
            &storage,
            "dreyes",
            UserRole::Faculty,
            "Instructor I",
            None,
            None,
        )
        .await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));

        let cached = ReportCache::open(cache.clone(), "annex_b", user.id, "2024", 60).await;
        cached.put(&serde_json::json!({ "track": "dual" })).await;

        let request = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .to_http_request();
        let update = UpdateUserRequest {
            email: None,
            password: None,
            role: None,
            status: None,
            full_name: None,
            position: Some("College Dean".to_string()),
            college_id: None,
            program_id: None,
        };
        let response = update_user(&UserService::new_lazy(), user.id, update, &request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let reopened = ReportCache::open(cache, "annex_b", user.id, "2024", 60).await;
        assert_eq!(reopened.get().await, None);
    }
}
