use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::ProgramService;
use crate::models::{
    ApiResponse, ErrorCode,
    programs::requests::{CreateProgramRequest, UpdateProgramRequest},
};
use crate::services::{storage_failure_response, write_failure_response};
use crate::storage::Storage;
use crate::utils::validate::{validate_directory_code, validate_display_text};

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ProgramNotFound,
        "Program not found",
    ))
}

// 所属学院必须存在
async fn ensure_college(storage: &Arc<dyn Storage>, college_id: i64) -> Result<(), HttpResponse> {
    match storage.get_college_by_id(college_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CollegeNotFound,
            "College not found",
        ))),
        Err(e) => Err(storage_failure_response(&e, "Failed to get college")),
    }
}

pub async fn create_program(
    service: &ProgramService,
    mut req: CreateProgramRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.code = req.code.trim().to_uppercase();
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_directory_code(&req.code) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_display_text(&req.name, "Program name") {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = ensure_college(&storage, req.college_id).await {
        return Ok(response);
    }

    match storage.create_program(req).await {
        Ok(program) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(program, "Program created")))
        }
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::ProgramAlreadyExists,
            "Program code already exists",
            ErrorCode::InternalServerError,
        )),
    }
}

pub async fn get_program(
    service: &ProgramService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_program_by_id(id).await {
        Ok(Some(program)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            program,
            "Program retrieved successfully",
        ))),
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(storage_failure_response(&e, "Failed to get program")),
    }
}

pub async fn update_program(
    service: &ProgramService,
    id: i64,
    mut req: UpdateProgramRequest,
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
        && let Err(msg) = validate_display_text(name, "Program name")
    {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;
    if let Some(college_id) = req.college_id
        && let Err(response) = ensure_college(&storage, college_id).await
    {
        return Ok(response);
    }

    match storage.update_program(id, req).await {
        Ok(Some(program)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(program, "Program updated")))
        }
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::ProgramAlreadyExists,
            "Program code already exists",
            ErrorCode::InternalServerError,
        )),
    }
}

pub async fn delete_program(
    service: &ProgramService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_program(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Program deleted"))),
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::DirectoryInUse,
            "Program still has subjects or users",
            ErrorCode::InternalServerError,
        )),
    }
}
