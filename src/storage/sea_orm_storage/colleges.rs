//! 学院存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::colleges::{ActiveModel, Column, Entity as Colleges};
use crate::errors::{FacultyEvalError, Result};
use crate::models::{
    PaginationInfo,
    colleges::{
        entities::College,
        requests::{CollegeListParams, CreateCollegeRequest, UpdateCollegeRequest},
        responses::CollegeListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_college_impl(&self, req: CreateCollegeRequest) -> Result<College> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建学院失败", e))?;

        Ok(result.into_college())
    }

    pub async fn get_college_by_id_impl(&self, id: i64) -> Result<Option<College>> {
        let result = Colleges::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询学院失败: {e}")))?;

        Ok(result.map(|m| m.into_college()))
    }

    pub async fn get_college_by_code_impl(&self, code: &str) -> Result<Option<College>> {
        let result = Colleges::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询学院失败: {e}")))?;

        Ok(result.map(|m| m.into_college()))
    }

    pub async fn list_colleges_with_pagination_impl(
        &self,
        params: CollegeListParams,
    ) -> Result<CollegeListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Colleges::find();

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
            .map_err(|e| FacultyEvalError::database_operation(format!("查询学院总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询学院页数失败: {e}")))?;
        let colleges = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询学院列表失败: {e}")))?;

        Ok(CollegeListResponse {
            items: colleges.into_iter().map(|m| m.into_college()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_college_impl(
        &self,
        id: i64,
        update: UpdateCollegeRequest,
    ) -> Result<Option<College>> {
        if self.get_college_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新学院失败", e))?;

        self.get_college_by_id_impl(id).await
    }

    pub async fn delete_college_impl(&self, id: i64) -> Result<bool> {
        let result = Colleges::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除学院失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_college_crud() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let ccs = fixtures::college(&storage, "CCS").await;
        fixtures::college(&storage, "CBA").await;

        let listed = storage
            .list_colleges_with_pagination_impl(CollegeListParams {
                pagination: PaginationQuery::default(),
                search: Some("cc".into()),
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
        assert_eq!(listed.items[0].code, "CCS");

        let updated = storage
            .update_college_impl(
                ccs.id,
                UpdateCollegeRequest {
                    code: None,
                    name: Some("College of Computing Studies".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "College of Computing Studies");

        let dup = storage
            .create_college_impl(CreateCollegeRequest {
                code: "CBA".into(),
                name: "Duplicate".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(dup.code(), "E009");
    }

    #[tokio::test]
    async fn test_delete_referenced_college_fails() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let ccs = fixtures::college(&storage, "CCS").await;
        fixtures::program(&storage, ccs.id, "BSCS").await;

        assert!(storage.delete_college_impl(ccs.id).await.is_err());
        assert!(storage.get_college_by_id_impl(ccs.id).await.unwrap().is_some());
    }
}
