pub mod annex;
pub mod cache;
pub mod results;
pub mod signatories;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::middlewares::SessionContext;
use crate::models::reports::requests::{AnnexBParams, PeriodReportParams, ResultsParams};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

use self::cache::ReportCache;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 缓存不可用时报表直接计算
    pub(crate) async fn report_cache(
        &self,
        request: &HttpRequest,
        kind: &str,
        evaluatee_id: i64,
        params: &str,
    ) -> Option<ReportCache> {
        let cache: Arc<dyn ObjectCache> = super::cache_from_request(request).ok()?;
        let ttl = self.get_config().evaluation.report_cache_ttl;
        Some(ReportCache::open(cache, kind, evaluatee_id, params, ttl).await)
    }

    // Annex A：学生评价逐项明细
    pub async fn annex_a(
        &self,
        session: SessionContext,
        evaluatee_id: i64,
        params: PeriodReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        annex::annex_a(self, session, evaluatee_id, params, request).await
    }

    // Annex B：三学年汇总
    pub async fn annex_b(
        &self,
        session: SessionContext,
        evaluatee_id: i64,
        params: AnnexBParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        annex::annex_b(self, session, evaluatee_id, params, request).await
    }

    // Annex C：上级评价与评语
    pub async fn annex_c(
        &self,
        session: SessionContext,
        evaluatee_id: i64,
        params: PeriodReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        annex::annex_c(self, session, evaluatee_id, params, request).await
    }

    // Annex D：确认表
    pub async fn annex_d(
        &self,
        session: SessionContext,
        evaluatee_id: i64,
        params: PeriodReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        annex::annex_d(self, session, evaluatee_id, params, request).await
    }

    pub async fn results(
        &self,
        session: SessionContext,
        params: ResultsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::list_results(self, session, params, request).await
    }
}

/// 加载被评人并校验查看范围
pub(crate) async fn load_evaluatee_in_scope(
    storage: &Arc<dyn Storage>,
    session: &SessionContext,
    evaluatee_id: i64,
) -> Result<User, HttpResponse> {
    let user = match storage.get_user_by_id(evaluatee_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Evaluatee not found",
            )));
        }
        Err(e) => return Err(super::storage_failure_response(&e, "Failed to get evaluatee")),
    };

    if !session.can_view_reports_of(&user) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ReportScopeDenied,
            "You are not allowed to view reports for this faculty member",
        )));
    }
    if matches!(user.role, UserRole::Student | UserRole::Admin) {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidEvaluatee,
            "Reports are only available for faculty members",
        )));
    }
    Ok(user)
}

pub(crate) fn cached_response(report: serde_json::Value) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(report, "Report retrieved successfully"))
}
