pub mod issue;
pub mod list;
pub mod redeem;
pub mod revoke;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middlewares::SessionContext;
use crate::models::evaluation_codes::requests::{
    EvaluationCodeListParams, IssueEvaluationCodeRequest, RedeemCodeRequest,
};
use crate::storage::Storage;

pub struct EvaluationCodeService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationCodeService {
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

    // 发放评教码
    pub async fn issue_code(
        &self,
        session: SessionContext,
        req: IssueEvaluationCodeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        issue::issue_code(self, session, req, request).await
    }

    pub async fn list_codes(
        &self,
        session: SessionContext,
        params: EvaluationCodeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_codes(self, session, params, request).await
    }

    // 停用评教码，已提交的评教不受影响
    pub async fn revoke_code(
        &self,
        session: SessionContext,
        code_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        revoke::revoke_code(self, session, code_id, request).await
    }

    // 兑换评教码，生成待完成的评价任务
    pub async fn redeem_code(
        &self,
        session: SessionContext,
        req: RedeemCodeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        redeem::redeem_code(self, session, req, request).await
    }
}
