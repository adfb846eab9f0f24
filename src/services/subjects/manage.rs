use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::SubjectService;
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest},
};
use crate::services::{storage_failure_response, write_failure_response};
use crate::storage::Storage;
use crate::utils::validate::{validate_directory_code, validate_display_text};

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubjectNotFound,
        "Subject not found",
    ))
}

// 所属专业必须存在
async fn ensure_program(storage: &Arc<dyn Storage>, program_id: i64) -> Result<(), HttpResponse> {
    match storage.get_program_by_id(program_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProgramNotFound,
            "Program not found",
        ))),
        Err(e) => Err(storage_failure_response(&e, "Failed to get program")),
    }
}

pub async fn create_subject(
    service: &SubjectService,
    mut req: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.code = req.code.trim().to_uppercase();
    req.title = req.title.trim().to_string();
    if let Err(msg) = validate_directory_code(&req.code) {
        return Ok(invalid(msg));
    }
    if let Err(msg) = validate_display_text(&req.title, "Subject title") {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = ensure_program(&storage, req.program_id).await {
        return Ok(response);
    }

    match storage.create_subject(req).await {
        Ok(subject) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(subject, "Subject created")))
        }
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::SubjectAlreadyExists,
            "Subject code already exists",
            ErrorCode::InternalServerError,
        )),
    }
}

pub async fn get_subject(
    service: &SubjectService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_subject_by_id(id).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject retrieved successfully",
        ))),
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(storage_failure_response(&e, "Failed to get subject")),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    id: i64,
    mut req: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.code = req.code.map(|c| c.trim().to_uppercase());
    req.title = req.title.map(|t| t.trim().to_string());
    if let Some(ref code) = req.code
        && let Err(msg) = validate_directory_code(code)
    {
        return Ok(invalid(msg));
    }
    if let Some(ref title) = req.title
        && let Err(msg) = validate_display_text(title, "Subject title")
    {
        return Ok(invalid(msg));
    }

    let storage = service.get_storage(request)?;
    if let Some(program_id) = req.program_id
        && let Err(response) = ensure_program(&storage, program_id).await
    {
        return Ok(response);
    }

    match storage.update_subject(id, req).await {
        Ok(Some(subject)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "Subject updated")))
        }
        Ok(None) => Ok(not_found()),
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::SubjectAlreadyExists,
            "Subject code already exists",
            ErrorCode::InternalServerError,
        )),
    }
}

pub async fn delete_subject(
    service: &SubjectService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_subject(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Subject deleted"))),
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(write_failure_response(
            &e,
            ErrorCode::DirectoryInUse,
            "Subject is still referenced by evaluation codes",
            ErrorCode::InternalServerError,
        )),
    }
}
