pub mod detail;
pub mod list;
pub mod pending;
pub mod rubric;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::SessionContext;
use crate::models::evaluations::requests::{EvaluationListParams, SubmitEvaluationRequest};
use crate::scoring::RubricVersion;
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn get_rubric(&self, version: RubricVersion) -> ActixResult<HttpResponse> {
        rubric::get_rubric(version).await
    }

    pub async fn list_rubrics(&self) -> ActixResult<HttpResponse> {
        rubric::list_rubrics().await
    }

    // 当前用户待完成的评价任务
    pub async fn list_pending(
        &self,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        pending::list_pending(self, session, request).await
    }

    pub async fn submit_evaluation(
        &self,
        session: SessionContext,
        req: SubmitEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_evaluation(self, session, req, request).await
    }

    pub async fn list_evaluations(
        &self,
        session: SessionContext,
        params: EvaluationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, session, params, request).await
    }

    pub async fn get_evaluation(
        &self,
        session: SessionContext,
        evaluation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_evaluation(self, session, evaluation_id, request).await
    }
}
