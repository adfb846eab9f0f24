pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::colleges::requests::{
    CollegeListParams, CreateCollegeRequest, UpdateCollegeRequest,
};
use crate::storage::Storage;

pub struct CollegeService {
    storage: Option<Arc<dyn Storage>>,
}

impl CollegeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_colleges(
        &self,
        params: CollegeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_colleges(self, params, request).await
    }

    pub async fn create_college(
        &self,
        req: CreateCollegeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_college(self, req, request).await
    }

    pub async fn get_college(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_college(self, id, request).await
    }

    pub async fn update_college(
        &self,
        id: i64,
        req: UpdateCollegeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_college(self, id, req, request).await
    }

    pub async fn delete_college(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_college(self, id, request).await
    }
}
