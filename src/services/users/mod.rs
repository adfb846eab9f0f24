pub mod create;
pub mod delete;
pub mod evaluatees;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::SessionContext;
use crate::models::users::entities::User;
use crate::models::users::requests::{
    CreateUserRequest, EvaluateeListParams, UpdateUserRequest, UserListParams,
};
use crate::models::users::responses::UserResponse;
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 发放人可选择的被评人
    pub async fn list_evaluatees(
        &self,
        session: SessionContext,
        params: EvaluateeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        evaluatees::list_evaluatees(self, session, params, request).await
    }

    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    pub async fn delete_user(
        &self,
        session: SessionContext,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, session, user_id, request).await
    }
}

/// 组装用户响应；名称查询失败时只记录日志
pub(crate) async fn user_response(storage: &Arc<dyn Storage>, user: User) -> UserResponse {
    let college_name = match user.college_id {
        Some(id) => match storage.get_college_by_id(id).await {
            Ok(college) => college.map(|c| c.name),
            Err(e) => {
                tracing::warn!("Failed to load college {} for user {}: {}", id, user.id, e);
                None
            }
        },
        None => None,
    };
    let program_name = match user.program_id {
        Some(id) => match storage.get_program_by_id(id).await {
            Ok(program) => program.map(|p| p.name),
            Err(e) => {
                tracing::warn!("Failed to load program {} for user {}: {}", id, user.id, e);
                None
            }
        },
        None => None,
    };

    UserResponse {
        user,
        college_name,
        program_name,
    }
}
