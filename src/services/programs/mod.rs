pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::programs::requests::{
    ProgramListParams, CreateProgramRequest, UpdateProgramRequest,
};
use crate::storage::Storage;

pub struct ProgramService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProgramService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_programs(
        &self,
        params: ProgramListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_programs(self, params, request).await
    }

    pub async fn create_program(
        &self,
        req: CreateProgramRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_program(self, req, request).await
    }

    pub async fn get_program(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_program(self, id, request).await
    }

    pub async fn update_program(
        &self,
        id: i64,
        req: UpdateProgramRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_program(self, id, req, request).await
    }

    pub async fn delete_program(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_program(self, id, request).await
    }
}
