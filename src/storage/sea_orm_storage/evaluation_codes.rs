//! 评教码与评价任务存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, write_error};
use crate::entity::evaluation_assignments::{
    ActiveModel as AssignmentActiveModel, Column as AssignmentColumn,
    Entity as EvaluationAssignments, Model as AssignmentModel,
};
use crate::entity::evaluation_codes::{
    ActiveModel, Column, Entity as EvaluationCodes, Model as CodeModel,
};
use crate::entity::subjects::{Entity as Subjects, Model as SubjectModel};
use crate::entity::users::{Entity as Users, Model as UserModel};
use crate::errors::{FacultyEvalError, Result};
use crate::models::{
    PaginationInfo,
    evaluation_codes::{
        entities::{AssignmentStatus, EvaluationAssignment, EvaluationCode, PendingAssignment},
        requests::{EvaluationCodeListQuery, NewEvaluationCode},
        responses::EvaluationCodeListResponse,
    },
};
use crate::utils::random_code::generate_evaluation_code;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

impl SeaOrmStorage {
    /// 发放评教码，码值冲突时重新生成
    pub async fn issue_evaluation_code_impl(
        &self,
        code: NewEvaluationCode,
        max_attempts: u32,
    ) -> Result<EvaluationCode> {
        let now = chrono::Utc::now().timestamp();

        for attempt in 1..=max_attempts.max(1) {
            let candidate = generate_evaluation_code();

            let model = ActiveModel {
                code: Set(candidate.clone()),
                evaluator_role: Set(code.evaluator_role.to_string()),
                evaluatee_id: Set(code.evaluatee_id),
                subject_id: Set(code.subject_id),
                section: Set(code.section.clone()),
                school_year: Set(code.school_year.clone()),
                semester: Set(code.semester.to_string()),
                rubric_version: Set(code.rubric_version.to_string()),
                issued_by: Set(code.issued_by),
                is_active: Set(true),
                created_at: Set(now),
                ..Default::default()
            };

            match model.insert(&self.db).await {
                Ok(result) => return Ok(result.into_evaluation_code()),
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    tracing::debug!("评教码 {candidate} 已存在，第 {attempt} 次重试");
                }
                Err(e) => return Err(write_error("发放评教码失败", e)),
            }
        }

        Err(FacultyEvalError::code_generation(format!(
            "Could not generate a unique evaluation code after {max_attempts} attempts"
        )))
    }

    pub async fn get_evaluation_code_by_id_impl(&self, id: i64) -> Result<Option<EvaluationCode>> {
        let result = EvaluationCodes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教码失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation_code()))
    }

    pub async fn get_evaluation_code_by_code_impl(
        &self,
        code: &str,
    ) -> Result<Option<EvaluationCode>> {
        let result = EvaluationCodes::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教码失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation_code()))
    }

    pub async fn list_evaluation_codes_with_pagination_impl(
        &self,
        query: EvaluationCodeListQuery,
    ) -> Result<EvaluationCodeListResponse> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let mut select = EvaluationCodes::find();

        if let Some(evaluatee_id) = query.evaluatee_id {
            select = select.filter(Column::EvaluateeId.eq(evaluatee_id));
        }
        if let Some(issued_by) = query.issued_by {
            select = select.filter(Column::IssuedBy.eq(issued_by));
        }
        if let Some(ref school_year) = query.school_year {
            select = select.filter(Column::SchoolYear.eq(school_year.as_str()));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester.to_string()));
        }
        if let Some(role) = query.evaluator_role {
            select = select.filter(Column::EvaluatorRole.eq(role.to_string()));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教码总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教码页数失败: {e}")))?;
        let codes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教码列表失败: {e}")))?;

        Ok(EvaluationCodeListResponse {
            items: codes.into_iter().map(|m| m.into_evaluation_code()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    pub async fn set_evaluation_code_active_impl(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<EvaluationCode>> {
        if self.get_evaluation_code_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            is_active: Set(is_active),
            ..Default::default()
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新评教码状态失败", e))?;

        self.get_evaluation_code_by_id_impl(id).await
    }

    /// 兑换评教码：同一评价人重复兑换返回已有任务
    pub async fn get_or_create_assignment_impl(
        &self,
        code_id: i64,
        evaluator_id: i64,
    ) -> Result<(EvaluationAssignment, bool)> {
        if let Some(existing) = self.find_assignment(code_id, evaluator_id).await? {
            return Ok((existing.into_assignment(), false));
        }

        let model = AssignmentActiveModel {
            code_id: Set(code_id),
            evaluator_id: Set(evaluator_id),
            status: Set(AssignmentStatus::Pending.to_string()),
            redeemed_at: Set(chrono::Utc::now().timestamp()),
            completed_at: Set(None),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok((result.into_assignment(), true)),
            // 并发兑换：另一请求已插入
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .find_assignment(code_id, evaluator_id)
                .await?
                .map(|m| (m.into_assignment(), false))
                .ok_or_else(|| write_error("创建评价任务失败", e)),
            Err(e) => Err(write_error("创建评价任务失败", e)),
        }
    }

    async fn find_assignment(
        &self,
        code_id: i64,
        evaluator_id: i64,
    ) -> Result<Option<AssignmentModel>> {
        EvaluationAssignments::find()
            .filter(AssignmentColumn::CodeId.eq(code_id))
            .filter(AssignmentColumn::EvaluatorId.eq(evaluator_id))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评价任务失败: {e}")))
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<EvaluationAssignment>> {
        let result = EvaluationAssignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评价任务失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 单个任务的展示信息，任务不是待完成状态时返回 None
    pub async fn get_pending_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<PendingAssignment>> {
        let row = EvaluationAssignments::find_by_id(assignment_id)
            .filter(AssignmentColumn::Status.eq(AssignmentStatus::PENDING))
            .find_also_related(EvaluationCodes)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评价任务失败: {e}")))?;

        let Some((assignment, Some(code))) = row else {
            return Ok(None);
        };

        Ok(self
            .attach_pending_details(vec![(assignment, code)])
            .await?
            .pop())
    }

    pub async fn list_pending_assignments_impl(
        &self,
        evaluator_id: i64,
    ) -> Result<Vec<PendingAssignment>> {
        let rows = EvaluationAssignments::find()
            .filter(AssignmentColumn::EvaluatorId.eq(evaluator_id))
            .filter(AssignmentColumn::Status.eq(AssignmentStatus::PENDING))
            .order_by_asc(AssignmentColumn::RedeemedAt)
            .find_also_related(EvaluationCodes)
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询待评任务失败: {e}")))?;

        let pairs = rows
            .into_iter()
            .filter_map(|(assignment, code)| code.map(|c| (assignment, c)))
            .collect();

        self.attach_pending_details(pairs).await
    }

    /// 批量补齐被评人与课程信息
    async fn attach_pending_details(
        &self,
        pairs: Vec<(AssignmentModel, CodeModel)>,
    ) -> Result<Vec<PendingAssignment>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let evaluatee_ids: Vec<i64> = pairs.iter().map(|(_, c)| c.evaluatee_id).collect();
        let subject_ids: Vec<i64> = pairs.iter().filter_map(|(_, c)| c.subject_id).collect();

        let users: HashMap<i64, UserModel> = Users::find()
            .filter(crate::entity::users::Column::Id.is_in(evaluatee_ids))
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询被评人失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let subjects: HashMap<i64, SubjectModel> = if subject_ids.is_empty() {
            HashMap::new()
        } else {
            Subjects::find()
                .filter(crate::entity::subjects::Column::Id.is_in(subject_ids))
                .all(&self.db)
                .await
                .map_err(|e| FacultyEvalError::database_operation(format!("查询课程失败: {e}")))?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        Ok(pairs
            .into_iter()
            .map(|(assignment, code)| {
                let user = users.get(&code.evaluatee_id);
                let subject = code.subject_id.and_then(|id| subjects.get(&id));
                let assignment = assignment.into_assignment();
                let code = code.into_evaluation_code();

                PendingAssignment {
                    assignment_id: assignment.id,
                    code: code.code,
                    evaluatee_id: code.evaluatee_id,
                    evaluatee_name: user.map(|u| u.full_name.clone()).unwrap_or_default(),
                    evaluatee_position: user.map(|u| u.position.clone()).unwrap_or_default(),
                    subject_id: code.subject_id,
                    subject_code: subject.map(|s| s.code.clone()),
                    subject_title: subject.map(|s| s.title.clone()),
                    section: code.section,
                    school_year: code.school_year,
                    semester: code.semester,
                    rubric_version: code.rubric_version,
                    redeemed_at: assignment.redeemed_at,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::fixtures;
    use crate::utils::random_code::is_valid_evaluation_code;

    #[tokio::test]
    async fn test_issue_and_lookup_code() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let faculty = fixtures::user(&storage, "prof", UserRole::Faculty, "Instructor I", None, None).await;

        let code = fixtures::code(&storage, UserRole::Student, faculty.id, admin.id).await;
        assert!(is_valid_evaluation_code(&code.code));
        assert!(code.is_active);

        let found = storage
            .get_evaluation_code_by_code_impl(&code.code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, code.id);
        assert_eq!(found.evaluatee_id, faculty.id);

        let revoked = storage
            .set_evaluation_code_active_impl(code.id, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!revoked.is_active);

        let active_only = storage
            .list_evaluation_codes_with_pagination_impl(EvaluationCodeListQuery {
                page: 1,
                size: 10,
                is_active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active_only.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_issue_for_missing_evaluatee_conflicts() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;

        let err = storage
            .issue_evaluation_code_impl(
                NewEvaluationCode {
                    evaluator_role: UserRole::Student,
                    evaluatee_id: 999,
                    subject_id: None,
                    section: None,
                    school_year: "2024-2025".into(),
                    semester: crate::scoring::Semester::First,
                    rubric_version: crate::scoring::RubricVersion::New,
                    issued_by: admin.id,
                },
                3,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E009");
    }

    #[tokio::test]
    async fn test_redeem_is_idempotent_per_evaluator() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let faculty = fixtures::user(&storage, "prof", UserRole::Faculty, "Instructor I", None, None).await;
        let s1 = fixtures::user(&storage, "s1", UserRole::Student, "Student", None, None).await;
        let s2 = fixtures::user(&storage, "s2", UserRole::Student, "Student", None, None).await;
        let code = fixtures::code(&storage, UserRole::Student, faculty.id, admin.id).await;

        let (first, created) = storage
            .get_or_create_assignment_impl(code.id, s1.id)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.status, AssignmentStatus::Pending);

        let (again, created) = storage
            .get_or_create_assignment_impl(code.id, s1.id)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(again.id, first.id);

        // 同一评教码可以被多个评价人兑换
        let (other, created) = storage
            .get_or_create_assignment_impl(code.id, s2.id)
            .await
            .unwrap();
        assert!(created);
        assert_ne!(other.id, first.id);

        let pending = storage.list_pending_assignments_impl(s1.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].assignment_id, first.id);
        assert_eq!(pending[0].evaluatee_name, "prof full");
        assert_eq!(pending[0].section.as_deref(), Some("A"));

        let single = storage
            .get_pending_assignment_impl(first.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(single.code, code.code);
    }
}
