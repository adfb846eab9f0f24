use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, SessionContext};
use crate::models::reports::requests::{AnnexBParams, PeriodReportParams, ResultsParams};
use crate::models::users::entities::UserRole;
use crate::services::ReportService;
use crate::utils::SafeEvaluateeIdI64;

// 懒加载的全局 ReportService 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn annex_a(
    req: HttpRequest,
    session: SessionContext,
    evaluatee_id: SafeEvaluateeIdI64,
    query: web::Query<PeriodReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .annex_a(session, evaluatee_id.0, query.into_inner(), &req)
        .await
}

pub async fn annex_b(
    req: HttpRequest,
    session: SessionContext,
    evaluatee_id: SafeEvaluateeIdI64,
    query: web::Query<AnnexBParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .annex_b(session, evaluatee_id.0, query.into_inner(), &req)
        .await
}

pub async fn annex_c(
    req: HttpRequest,
    session: SessionContext,
    evaluatee_id: SafeEvaluateeIdI64,
    query: web::Query<PeriodReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .annex_c(session, evaluatee_id.0, query.into_inner(), &req)
        .await
}

pub async fn annex_d(
    req: HttpRequest,
    session: SessionContext,
    evaluatee_id: SafeEvaluateeIdI64,
    query: web::Query<PeriodReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .annex_d(session, evaluatee_id.0, query.into_inner(), &req)
        .await
}

pub async fn results(
    req: HttpRequest,
    session: SessionContext,
    query: web::Query<ResultsParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .results(session, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    // 细粒度范围在业务层检查
                    .wrap(middlewares::RequireRole::new_any(UserRole::report_viewer_roles()))
                    .route("/results", web::get().to(results))
                    .route("/{evaluatee_id}/annex-a", web::get().to(annex_a))
                    .route("/{evaluatee_id}/annex-b", web::get().to(annex_b))
                    .route("/{evaluatee_id}/annex-c", web::get().to(annex_c))
                    .route("/{evaluatee_id}/annex-d", web::get().to(annex_d)),
            ),
    );
}
