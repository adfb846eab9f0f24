//! 专业存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::programs::{ActiveModel, Column, Entity as Programs};
use crate::errors::{FacultyEvalError, Result};
use crate::models::{
    PaginationInfo,
    programs::{
        entities::Program,
        requests::{CreateProgramRequest, ProgramListParams, UpdateProgramRequest},
        responses::ProgramListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_program_impl(&self, req: CreateProgramRequest) -> Result<Program> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            college_id: Set(req.college_id),
            code: Set(req.code),
            name: Set(req.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建专业失败", e))?;

        Ok(result.into_program())
    }

    pub async fn get_program_by_id_impl(&self, id: i64) -> Result<Option<Program>> {
        let result = Programs::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询专业失败: {e}")))?;

        Ok(result.map(|m| m.into_program()))
    }

    pub async fn get_program_by_code_impl(&self, code: &str) -> Result<Option<Program>> {
        let result = Programs::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询专业失败: {e}")))?;

        Ok(result.map(|m| m.into_program()))
    }

    pub async fn list_programs_with_pagination_impl(
        &self,
        params: ProgramListParams,
    ) -> Result<ProgramListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Programs::find();

        if let Some(college_id) = params.college_id {
            select = select.filter(Column::CollegeId.eq(college_id));
        }

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询专业总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询专业页数失败: {e}")))?;
        let programs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询专业列表失败: {e}")))?;

        Ok(ProgramListResponse {
            items: programs.into_iter().map(|m| m.into_program()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_program_impl(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        if self.get_program_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(college_id) = update.college_id {
            model.college_id = Set(college_id);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新专业失败", e))?;

        self.get_program_by_id_impl(id).await
    }

    pub async fn delete_program_impl(&self, id: i64) -> Result<bool> {
        let result = Programs::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除专业失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_programs_filtered_by_college() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let ccs = fixtures::college(&storage, "CCS").await;
        let cba = fixtures::college(&storage, "CBA").await;
        fixtures::program(&storage, ccs.id, "BSIT").await;
        fixtures::program(&storage, ccs.id, "BSCS").await;
        fixtures::program(&storage, cba.id, "BSA").await;

        let listed = storage
            .list_programs_with_pagination_impl(ProgramListParams {
                pagination: PaginationQuery::default(),
                college_id: Some(ccs.id),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 2);
        assert_eq!(listed.items[0].code, "BSCS");
    }

    #[tokio::test]
    async fn test_program_requires_existing_college() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let err = storage
            .create_program_impl(CreateProgramRequest {
                college_id: 999,
                code: "BSIT".into(),
                name: "Orphan".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E009");
    }
}
