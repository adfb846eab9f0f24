//! 评教提交与查询存储操作

use super::{SeaOrmStorage, write_error};
use crate::entity::evaluation_assignments::{
    Column as AssignmentColumn, Entity as EvaluationAssignments,
};
use crate::entity::evaluation_ratings_detail::{
    ActiveModel as DetailActiveModel, Column as DetailColumn, Entity as EvaluationRatingsDetail,
};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{FacultyEvalError, Result};
use crate::models::{
    PaginationInfo,
    evaluation_codes::entities::AssignmentStatus,
    evaluations::{
        entities::{Evaluation, RatingDetail},
        requests::{EvaluationListQuery, NewEvaluation},
        responses::EvaluationListResponse,
    },
};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 在一个事务内完成任务状态切换、评教写入和明细写入
    pub async fn submit_evaluation_impl(&self, new: NewEvaluation) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("开启事务失败: {e}")))?;

        // 只有待完成的任务可以切换，防止重复提交
        let updated = EvaluationAssignments::update_many()
            .col_expr(
                AssignmentColumn::Status,
                Expr::value(AssignmentStatus::COMPLETED),
            )
            .col_expr(AssignmentColumn::CompletedAt, Expr::value(now))
            .filter(AssignmentColumn::Id.eq(new.assignment_id))
            .filter(AssignmentColumn::EvaluatorId.eq(new.evaluator_id))
            .filter(AssignmentColumn::Status.eq(AssignmentStatus::PENDING))
            .exec(&txn)
            .await
            .map_err(|e| write_error("更新评价任务失败", e))?;

        if updated.rows_affected == 0 {
            txn.rollback().await.map_err(|e| {
                FacultyEvalError::database_operation(format!("回滚事务失败: {e}"))
            })?;
            return Err(FacultyEvalError::conflict(
                "This assignment has already been evaluated",
            ));
        }

        let scores = new.scores;
        let model = ActiveModel {
            assignment_id: Set(new.assignment_id),
            evaluator_id: Set(new.evaluator_id),
            evaluatee_id: Set(new.evaluatee_id),
            evaluator_role: Set(new.evaluator_role.to_string()),
            subject_id: Set(new.subject_id),
            section: Set(new.section),
            school_year: Set(new.school_year),
            semester: Set(new.semester.to_string()),
            rubric_version: Set(new.rubric_version.to_string()),
            score_commitment: Set(scores.commitment.into()),
            score_knowledge: Set(scores.knowledge.into()),
            score_teaching: Set(scores.teaching.into()),
            score_management: Set(scores.management.into()),
            total_score: Set(scores.total.into()),
            comments: Set(new.comments),
            evaluator_name: Set(Some(new.evaluator_name)),
            evaluator_position: Set(Some(new.evaluator_position)),
            evaluation_date: Set(Some(now)),
            created_at: Set(now),
            ..Default::default()
        };

        let evaluation = model
            .insert(&txn)
            .await
            .map_err(|e| write_error("写入评教失败", e))?;

        let details: Vec<DetailActiveModel> = new
            .ratings
            .iter()
            .map(|r| DetailActiveModel {
                evaluation_id: Set(evaluation.id),
                category: Set(r.category.as_str().to_string()),
                criterion_index: Set(r.index as i32),
                rating: Set(i32::from(r.value)),
                ..Default::default()
            })
            .collect();

        if !details.is_empty() {
            EvaluationRatingsDetail::insert_many(details)
                .exec(&txn)
                .await
                .map_err(|e| write_error("写入评分明细失败", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(evaluation.into_evaluation())
    }

    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    pub async fn get_evaluation_ratings_impl(&self, evaluation_id: i64) -> Result<Vec<RatingDetail>> {
        let rows = EvaluationRatingsDetail::find()
            .filter(DetailColumn::EvaluationId.eq(evaluation_id))
            .order_by_asc(DetailColumn::Category)
            .order_by_asc(DetailColumn::CriterionIndex)
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评分明细失败: {e}")))?;

        Ok(rows.into_iter().filter_map(|m| m.into_rating_detail()).collect())
    }

    pub async fn list_evaluations_with_pagination_impl(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        let mut select = Evaluations::find();

        if let Some(evaluatee_id) = query.evaluatee_id {
            select = select.filter(Column::EvaluateeId.eq(evaluatee_id));
        }
        if let Some(evaluator_id) = query.evaluator_id {
            select = select.filter(Column::EvaluatorId.eq(evaluator_id));
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

        // 被评人所属学院/专业
        if query.college_id.is_some() || query.program_id.is_some() {
            let mut scope = Query::select();
            scope.column(UserColumn::Id).from(Users);
            if let Some(college_id) = query.college_id {
                scope.and_where(UserColumn::CollegeId.eq(college_id));
            }
            if let Some(program_id) = query.program_id {
                scope.and_where(UserColumn::ProgramId.eq(program_id));
            }
            select = select.filter(Column::EvaluateeId.in_subquery(scope.to_owned()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教页数失败: {e}")))?;
        let evaluations = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教列表失败: {e}")))?;

        Ok(EvaluationListResponse {
            items: evaluations.into_iter().map(|m| m.into_evaluation()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::evaluation_codes::entities::EvaluationCode;
    use crate::models::users::entities::{User, UserRole};
    use crate::scoring::submission::{score_evaluation, validate_ratings};
    use crate::scoring::{RatingInput, RubricVersion, Score};
    use crate::storage::sea_orm_storage::fixtures;

    pub(crate) fn full_ratings(version: RubricVersion, value: u8) -> Vec<RatingInput> {
        version
            .categories()
            .iter()
            .flat_map(|c| {
                (0..c.indicators.len()).map(move |index| RatingInput {
                    category: c.code,
                    index,
                    value,
                })
            })
            .collect()
    }

    pub(crate) fn new_evaluation(
        assignment_id: i64,
        evaluator: &User,
        code: &EvaluationCode,
        value: u8,
        comments: Option<&str>,
    ) -> NewEvaluation {
        let ratings = full_ratings(code.rubric_version, value);
        let sheet = validate_ratings(code.rubric_version, &ratings).unwrap();
        NewEvaluation {
            assignment_id,
            evaluator_id: evaluator.id,
            evaluatee_id: code.evaluatee_id,
            evaluator_role: evaluator.role,
            subject_id: code.subject_id,
            section: code.section.clone(),
            school_year: code.school_year.clone(),
            semester: code.semester,
            rubric_version: code.rubric_version,
            scores: score_evaluation(code.rubric_version, &sheet),
            comments: comments.map(str::to_string),
            evaluator_name: evaluator.full_name.clone(),
            evaluator_position: evaluator.position.clone(),
            ratings,
        }
    }

    #[tokio::test]
    async fn test_submit_completes_assignment_once() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let faculty = fixtures::user(&storage, "prof", UserRole::Faculty, "Instructor I", None, None).await;
        let student = fixtures::user(&storage, "s1", UserRole::Student, "Student", None, None).await;
        let code = fixtures::code(&storage, UserRole::Student, faculty.id, admin.id).await;
        let (assignment, _) = storage
            .get_or_create_assignment_impl(code.id, student.id)
            .await
            .unwrap();

        let evaluation = storage
            .submit_evaluation_impl(new_evaluation(assignment.id, &student, &code, 4, Some("Good")))
            .await
            .unwrap();
        assert_eq!(evaluation.total_score, Score::Value(4.0));
        assert_eq!(evaluation.evaluatee_id, faculty.id);

        let ratings = storage.get_evaluation_ratings_impl(evaluation.id).await.unwrap();
        assert_eq!(ratings.len(), RubricVersion::New.indicator_count());
        assert!(ratings.iter().all(|r| r.rating == 4));

        let assignment = storage
            .get_assignment_by_id_impl(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Completed);
        assert!(assignment.completed_at.is_some());
        assert!(storage.list_pending_assignments_impl(student.id).await.unwrap().is_empty());

        let err = storage
            .submit_evaluation_impl(new_evaluation(assignment.id, &student, &code, 5, None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E009");
    }

    #[tokio::test]
    async fn test_failed_detail_insert_rolls_back() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let faculty = fixtures::user(&storage, "prof", UserRole::Faculty, "Instructor I", None, None).await;
        let student = fixtures::user(&storage, "s1", UserRole::Student, "Student", None, None).await;
        let code = fixtures::code(&storage, UserRole::Student, faculty.id, admin.id).await;
        let (assignment, _) = storage
            .get_or_create_assignment_impl(code.id, student.id)
            .await
            .unwrap();

        // 重复的明细违反唯一索引
        let mut broken = new_evaluation(assignment.id, &student, &code, 3, None);
        let first = broken.ratings[0];
        broken.ratings.push(first);
        assert!(storage.submit_evaluation_impl(broken).await.is_err());

        let assignment = storage
            .get_assignment_by_id_impl(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Pending);

        let listed = storage
            .list_evaluations_with_pagination_impl(EvaluationListQuery {
                page: 1,
                size: 10,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_list_scoped_by_college() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let ccs = fixtures::college(&storage, "CCS").await;
        let cba = fixtures::college(&storage, "CBA").await;
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let student = fixtures::user(&storage, "s1", UserRole::Student, "Student", None, None).await;

        for (name, college) in [("p1", &ccs), ("p2", &cba)] {
            let faculty =
                fixtures::user(&storage, name, UserRole::Faculty, "Instructor I", Some(college.id), None)
                    .await;
            let code = fixtures::code(&storage, UserRole::Student, faculty.id, admin.id).await;
            let (assignment, _) = storage
                .get_or_create_assignment_impl(code.id, student.id)
                .await
                .unwrap();
            storage
                .submit_evaluation_impl(new_evaluation(assignment.id, &student, &code, 5, None))
                .await
                .unwrap();
        }

        let scoped = storage
            .list_evaluations_with_pagination_impl(EvaluationListQuery {
                page: 1,
                size: 10,
                college_id: Some(ccs.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scoped.pagination.total, 1);

        let all = storage
            .list_evaluations_with_pagination_impl(EvaluationListQuery {
                page: 1,
                size: 10,
                evaluator_id: Some(student.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
    }
}
