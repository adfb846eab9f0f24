use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_response};
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_display_text, validate_email, validate_password_simple, validate_username,
};

pub(crate) fn validate_create_request(user_data: &CreateUserRequest) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_username(&user_data.username) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }
    for (value, field) in [
        (&user_data.full_name, "Full name"),
        (&user_data.position, "Position"),
    ] {
        if let Err(msg) = validate_display_text(value, field) {
            return Err(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(response) = validate_create_request(&user_data) {
        return Ok(response);
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };
    user_data.full_name = user_data.full_name.trim().to_string();
    user_data.position = user_data.position.trim().to_string();

    let storage = service.get_storage(request)?;

    match storage.create_user(user_data).await {
        Ok(user) => {
            tracing::info!("User {} created with role {}", user.username, user.role);
            let response = user_response(&storage, user).await;
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(response, "User created successfully")))
        }
        Err(e) => Ok(crate::services::write_failure_response(
            &e,
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
            ErrorCode::UserCreationFailed,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            username: "mreyes".to_string(),
            email: "mreyes@example.edu".to_string(),
            password: "Faculty2024x".to_string(),
            role: UserRole::Faculty,
            full_name: "Maria Reyes".to_string(),
            position: "Assistant Professor".to_string(),
            college_id: Some(1),
            program_id: None,
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(validate_create_request(&request()).is_ok());

        let mut weak = request();
        weak.password = "short".to_string();
        assert!(validate_create_request(&weak).is_err());

        let mut blank = request();
        blank.position = "   ".to_string();
        assert!(validate_create_request(&blank).is_err());
    }
}
