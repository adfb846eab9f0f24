use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::SessionContext;
use crate::models::auth::responses::{
    RefreshTokenResponse, SessionResponse, TokenVerificationResponse,
};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::{self, JwtUtils};

use super::AuthService;

fn expired_response() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_response());
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(expired_response());
    };

    // 重新读取用户，角色变更或停用立即生效
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(expired_response()),
        Err(e) => {
            return Ok(super::super::storage_failure_response(
                &e,
                "Failed to refresh token",
            ));
        }
    };

    match JwtUtils::generate_access_token(user.id, user.role.as_str()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

/// RequireJWT 已经完成校验
pub async fn handle_verify_token() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub async fn handle_get_session(session: SessionContext) -> ActixResult<HttpResponse> {
    let info = session.info();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SessionResponse {
            user: session.user().clone(),
            session: info,
        },
        "Session retrieved successfully",
    )))
}
