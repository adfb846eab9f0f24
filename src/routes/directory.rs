//! 学院、专业、课程目录
//!
//! 所有登录用户可读，只有管理员可写。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::colleges::requests::{
    CollegeListParams, CreateCollegeRequest, UpdateCollegeRequest,
};
use crate::models::programs::requests::{
    CreateProgramRequest, ProgramListParams, UpdateProgramRequest,
};
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{CollegeService, ProgramService, SubjectService};
use crate::utils::SafeIDI64;

static COLLEGE_SERVICE: Lazy<CollegeService> = Lazy::new(CollegeService::new_lazy);
static PROGRAM_SERVICE: Lazy<ProgramService> = Lazy::new(ProgramService::new_lazy);
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

// 学院
pub async fn list_colleges(
    req: HttpRequest,
    query: web::Query<CollegeListParams>,
) -> ActixResult<HttpResponse> {
    COLLEGE_SERVICE.list_colleges(query.into_inner(), &req).await
}

pub async fn create_college(
    req: HttpRequest,
    data: web::Json<CreateCollegeRequest>,
) -> ActixResult<HttpResponse> {
    COLLEGE_SERVICE.create_college(data.into_inner(), &req).await
}

pub async fn get_college(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COLLEGE_SERVICE.get_college(id.0, &req).await
}

pub async fn update_college(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateCollegeRequest>,
) -> ActixResult<HttpResponse> {
    COLLEGE_SERVICE
        .update_college(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_college(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COLLEGE_SERVICE.delete_college(id.0, &req).await
}

// 专业
pub async fn list_programs(
    req: HttpRequest,
    query: web::Query<ProgramListParams>,
) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.list_programs(query.into_inner(), &req).await
}

pub async fn create_program(
    req: HttpRequest,
    data: web::Json<CreateProgramRequest>,
) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.create_program(data.into_inner(), &req).await
}

pub async fn get_program(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.get_program(id.0, &req).await
}

pub async fn update_program(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateProgramRequest>,
) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE
        .update_program(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_program(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    PROGRAM_SERVICE.delete_program(id.0, &req).await
}

// 课程
pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.create_subject(data.into_inner(), &req).await
}

pub async fn get_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(id.0, &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(id.0, &req).await
}

// 读取对所有登录用户开放，写入仅管理员
macro_rules! directory_scope {
    ($path:literal, $list:ident, $create:ident, $get:ident, $update:ident, $delete:ident) => {
        web::scope($path)
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to($list)).route(
                    web::post()
                        .to($create)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to($get))
                    .route(
                        web::put()
                            .to($update)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to($delete)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
    };
}

// 配置路由
pub fn configure_directory_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(directory_scope!(
        "/api/v1/colleges",
        list_colleges,
        create_college,
        get_college,
        update_college,
        delete_college
    ))
    .service(directory_scope!(
        "/api/v1/programs",
        list_programs,
        create_program,
        get_program,
        update_program,
        delete_program
    ))
    .service(directory_scope!(
        "/api/v1/subjects",
        list_subjects,
        create_subject,
        get_subject,
        update_subject,
        delete_subject
    ));
}
