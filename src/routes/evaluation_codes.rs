use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, SessionContext};
use crate::models::evaluation_codes::requests::{
    EvaluationCodeListParams, IssueEvaluationCodeRequest, RedeemCodeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationCodeService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EvaluationCodeService 实例
static EVALUATION_CODE_SERVICE: Lazy<EvaluationCodeService> =
    Lazy::new(EvaluationCodeService::new_lazy);

pub async fn issue_code(
    req: HttpRequest,
    session: SessionContext,
    body: web::Json<IssueEvaluationCodeRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_CODE_SERVICE
        .issue_code(session, body.into_inner(), &req)
        .await
}

pub async fn list_codes(
    req: HttpRequest,
    session: SessionContext,
    query: web::Query<EvaluationCodeListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_CODE_SERVICE
        .list_codes(session, query.into_inner(), &req)
        .await
}

pub async fn revoke_code(
    req: HttpRequest,
    session: SessionContext,
    code_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_CODE_SERVICE
        .revoke_code(session, code_id.0, &req)
        .await
}

pub async fn redeem_code(
    req: HttpRequest,
    session: SessionContext,
    body: web::Json<RedeemCodeRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_CODE_SERVICE
        .redeem_code(session, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_evaluation_code_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluation-codes")
            .wrap(middlewares::RequireJWT)
            // 兑换 - 学生与上级角色，按登录用户限流
            .service(
                web::resource("/redeem")
                    .wrap(middlewares::RateLimit::redeem_code())
                    .route(web::post().to(redeem_code)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::issuer_roles()))
                    .route("", web::get().to(list_codes))
                    .route("", web::post().to(issue_code))
                    .route("/{id}/revoke", web::post().to(revoke_code)),
            ),
    );
}
