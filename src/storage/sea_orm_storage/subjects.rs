//! 课程存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{FacultyEvalError, Result};
use crate::models::{
    PaginationInfo,
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            program_id: Set(req.program_id),
            code: Set(req.code),
            title: Set(req.title),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建课程失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_code_impl(&self, code: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_with_pagination_impl(
        &self,
        params: SubjectListParams,
    ) -> Result<SubjectListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Subjects::find();

        if let Some(program_id) = params.program_id {
            select = select.filter(Column::ProgramId.eq(program_id));
        }

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Title.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询课程总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询课程页数失败: {e}")))?;
        let subjects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(SubjectListResponse {
            items: subjects.into_iter().map(|m| m.into_subject()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(program_id) = update.program_id {
            model.program_id = Set(program_id);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新课程失败", e))?;

        self.get_subject_by_id_impl(id).await
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除课程失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_subject_update_and_lookup() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let college = fixtures::college(&storage, "CCS").await;
        let program = fixtures::program(&storage, college.id, "BSIT").await;

        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                program_id: program.id,
                code: "IT101".into(),
                title: "Introduction to Computing".into(),
            })
            .await
            .unwrap();

        let updated = storage
            .update_subject_impl(
                subject.id,
                UpdateSubjectRequest {
                    program_id: None,
                    code: Some("IT102".into()),
                    title: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.code, "IT102");
        assert!(storage.get_subject_by_code_impl("IT101").await.unwrap().is_none());
        assert_eq!(
            storage.get_subject_by_code_impl("IT102").await.unwrap().unwrap().id,
            subject.id
        );

        assert!(storage.update_subject_impl(999, UpdateSubjectRequest {
            program_id: None,
            code: None,
            title: None,
        }).await.unwrap().is_none());
    }
}
