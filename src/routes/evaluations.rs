use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, SessionContext};
use crate::models::evaluations::requests::{EvaluationListParams, SubmitEvaluationRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::RubricVersion;
use crate::services::EvaluationService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

pub async fn list_rubrics() -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.list_rubrics().await
}

pub async fn get_rubric(version: web::Path<String>) -> ActixResult<HttpResponse> {
    match version.parse::<RubricVersion>() {
        Ok(version) => EVALUATION_SERVICE.get_rubric(version).await,
        Err(msg) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg))),
    }
}

pub async fn list_pending(req: HttpRequest, session: SessionContext) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.list_pending(session, &req).await
}

pub async fn submit_evaluation(
    req: HttpRequest,
    session: SessionContext,
    body: web::Json<SubmitEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .submit_evaluation(session, body.into_inner(), &req)
        .await
}

pub async fn list_evaluations(
    req: HttpRequest,
    session: SessionContext,
    query: web::Query<EvaluationListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(session, query.into_inner(), &req)
        .await
}

pub async fn get_evaluation(
    req: HttpRequest,
    session: SessionContext,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_evaluation(session, id.0, &req).await
}

// 配置路由
pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/rubrics")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_rubrics))
            .route("/{version}", web::get().to(get_rubric)),
    )
    .service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列表范围由会话决定
                    .route(web::get().to(list_evaluations))
                    .route(
                        web::post()
                            .to(submit_evaluation)
                            .wrap(middlewares::RateLimit::submit_evaluation()),
                    ),
            )
            .route("/pending", web::get().to(list_pending))
            .route("/{id}", web::get().to(get_evaluation)),
    );
}
