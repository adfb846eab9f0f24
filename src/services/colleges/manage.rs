use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CollegeService;
use crate::models::{
    ApiResponse, ErrorCode,
    colleges::requests::{CreateCollegeRequest, UpdateCollegeRequest},
};
use crate::services::{storage_failure_response, write_failure_response};
use crate::utils::validate::{validate_directory_code, validate_display_text};

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::CollegeNotFound,
        "College not found",
    ))
}

pub async fn create_college(
    service: &CollegeService,
    mut req: CreateCollegeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.code = req.code.trim().to_uppercase();
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_directory_code(&req.code) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_display_text(&req.name, "College name") {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;
    match storage.create_college(req).await {
        Ok(college) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(college, "College created")))
        }
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::CollegeAlreadyExists,
            "College code already exists",
            ErrorCode::InternalServerError,
        )),
    }
}

pub async fn get_college(
    service: &CollegeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_college_by_id(id).await {
        Ok(Some(college)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            college,
            "College retrieved successfully",
        ))),
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(storage_failure_response(&e, "Failed to get college")),
    }
}

pub async fn update_college(
    service: &CollegeService,
    id: i64,
    mut req: UpdateCollegeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.code = req.code.map(|c| c.trim().to_uppercase());
    req.name = req.name.map(|n| n.trim().to_string());
    if let Some(ref code) = req.code
        && let Err(msg) = validate_directory_code(code)
    {
        return Ok(invalid(msg));
    }
    if let Some(ref name) = req.name
        && let Err(msg) = validate_display_text(name, "College name")
    {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;
    match storage.update_college(id, req).await {
        Ok(Some(college)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(college, "College updated")))
        }
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::CollegeAlreadyExists,
            "College code already exists",
            ErrorCode::InternalServerError,
        )),
    }
}

pub async fn delete_college(
    service: &CollegeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_college(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("College deleted"))),
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::DirectoryInUse,
            "College still has programs or users",
            ErrorCode::InternalServerError,
        )),
    }
}
