use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode, auth::requests::RegisterRequest};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_display_text, validate_email, validate_password_simple, validate_username,
};

use super::AuthService;

/// 自助注册的账号固定为学生
const STUDENT_POSITION: &str = "Student";

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_register_request(&register_request) {
        return Ok(response);
    }

    let storage = service.get_storage(request)?;

    if let Err(response) = check_username_exists(&storage, &register_request.username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &register_request.email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let create_request = CreateUserRequest {
        username: register_request.username,
        email: register_request.email,
        password: password_hash,
        role: UserRole::Student,
        full_name: register_request.full_name.trim().to_string(),
        position: STUDENT_POSITION.to_string(),
        college_id: register_request.college_id,
        program_id: register_request.program_id,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Student {} registered", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registration successful")))
        }
        Err(e) => Ok(super::super::write_failure_response(
            &e,
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
            ErrorCode::RegisterFailed,
        )),
    }
}

fn validate_register_request(req: &RegisterRequest) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_username(&req.username) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&req.email) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if req.password != req.confirm_password {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordMismatch,
            "Passwords do not match",
        )));
    }
    if let Err(msg) = validate_password_simple(&req.password) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }
    if let Err(msg) = validate_display_text(&req.full_name, "Full name") {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    Ok(())
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(super::super::storage_failure_response(&e, "Register failed")),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(super::super::storage_failure_response(&e, "Register failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "juan_dc".to_string(),
            email: "juan@example.edu".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            full_name: "Juan Dela Cruz".to_string(),
            college_id: None,
            program_id: None,
        }
    }

    #[test]
    fn test_password_confirmation_required() {
        assert!(validate_register_request(&request("Secret123!", "Secret123!")).is_ok());

        let response = validate_register_request(&request("Secret123!", "Secret124!")).unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
