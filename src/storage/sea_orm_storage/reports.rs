//! 报表取数：评教记录与评分明细

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::evaluation_ratings_detail::{
    Column as DetailColumn, Entity as EvaluationRatingsDetail,
};
use crate::entity::evaluations::{Column, Entity as Evaluations, Model as EvaluationModel};
use crate::errors::{FacultyEvalError, Result};
use crate::models::users::entities::UserRole;
use crate::scoring::annex::EvaluationRecord;
use crate::scoring::{AcademicPeriod, CategoryCode, Component, Semester};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

fn period_condition(periods: &[AcademicPeriod]) -> Condition {
    periods.iter().fold(Condition::any(), |cond, period| {
        cond.add(
            Condition::all()
                .add(Column::SchoolYear.eq(period.school_year.as_str()))
                .add(Column::Semester.eq(period.semester.to_string())),
        )
    })
}

impl SeaOrmStorage {
    pub async fn list_evaluation_records_impl(
        &self,
        evaluatee_id: i64,
        periods: &[AcademicPeriod],
    ) -> Result<Vec<EvaluationRecord>> {
        if periods.is_empty() {
            return Ok(Vec::new());
        }

        let evaluations = Evaluations::find()
            .filter(Column::EvaluateeId.eq(evaluatee_id))
            .filter(period_condition(periods))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教记录失败: {e}")))?;

        self.build_records(evaluations).await
    }

    pub async fn list_evaluation_records_for_evaluatees_impl(
        &self,
        evaluatee_ids: &[i64],
        period: &AcademicPeriod,
    ) -> Result<HashMap<i64, Vec<EvaluationRecord>>> {
        if evaluatee_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let evaluations = Evaluations::find()
            .filter(Column::EvaluateeId.is_in(evaluatee_ids.iter().copied()))
            .filter(period_condition(std::slice::from_ref(period)))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评教记录失败: {e}")))?;

        let evaluatee_of: HashMap<i64, i64> = evaluations
            .iter()
            .map(|e| (e.id, e.evaluatee_id))
            .collect();

        let mut grouped: HashMap<i64, Vec<EvaluationRecord>> = HashMap::new();
        for record in self.build_records(evaluations).await? {
            if let Some(&evaluatee_id) = evaluatee_of.get(&record.evaluation_id) {
                grouped.entry(evaluatee_id).or_default().push(record);
            }
        }
        Ok(grouped)
    }

    /// 批量加载评分明细并组装报表记录
    async fn build_records(&self, evaluations: Vec<EvaluationModel>) -> Result<Vec<EvaluationRecord>> {
        if evaluations.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = evaluations.iter().map(|e| e.id).collect();
        let details = EvaluationRatingsDetail::find()
            .filter(DetailColumn::EvaluationId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询评分明细失败: {e}")))?;

        let mut ratings: HashMap<i64, Vec<(CategoryCode, usize, u8)>> = HashMap::new();
        for detail in details {
            let evaluation_id = detail.evaluation_id;
            match detail.into_rating_detail() {
                Some(d) => ratings
                    .entry(evaluation_id)
                    .or_default()
                    .push((d.category, d.criterion_index, d.rating)),
                None => tracing::warn!("评教 {evaluation_id} 存在无法识别的评分明细，已忽略"),
            }
        }

        Ok(evaluations
            .into_iter()
            .filter_map(|e| {
                let rows = ratings.remove(&e.id).unwrap_or_default();
                into_record(e, rows)
            })
            .collect())
    }
}

/// 角色或学期无法识别的评教不计入报表
fn into_record(
    e: EvaluationModel,
    ratings: Vec<(CategoryCode, usize, u8)>,
) -> Option<EvaluationRecord> {
    let population = match e.evaluator_role.parse::<UserRole>() {
        Ok(UserRole::Student) => Component::Student,
        Ok(_) => Component::Supervisor,
        Err(_) => {
            tracing::warn!(
                "评教 {} 的评价人角色 '{}' 无法识别，已忽略",
                e.id,
                e.evaluator_role
            );
            return None;
        }
    };
    let Ok(semester) = e.semester.parse::<Semester>() else {
        tracing::warn!("评教 {} 的学期 '{}' 无法识别，已忽略", e.id, e.semester);
        return None;
    };
    let evaluation_date = e
        .evaluation_date
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

    Some(EvaluationRecord {
        evaluation_id: e.id,
        population,
        evaluator_role: e.evaluator_role,
        evaluator_name: e.evaluator_name,
        evaluator_position: e.evaluator_position,
        evaluation_date,
        period: AcademicPeriod::new(e.school_year, semester),
        subject_id: e.subject_id,
        section: e.section,
        comments: e.comments,
        ratings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::annex::period_scores;
    use crate::scoring::Track;
    use crate::storage::sea_orm_storage::evaluations::tests::new_evaluation;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_records_carry_population_and_ratings() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let faculty = fixtures::user(&storage, "prof", UserRole::Faculty, "Instructor I", None, None).await;
        let student = fixtures::user(&storage, "s1", UserRole::Student, "Student", None, None).await;
        let dean = fixtures::user(&storage, "dean", UserRole::Dean, "Dean", None, None).await;

        for (evaluator, value) in [(&student, 5), (&dean, 4)] {
            let code = fixtures::code(&storage, evaluator.role, faculty.id, admin.id).await;
            let (assignment, _) = storage
                .get_or_create_assignment_impl(code.id, evaluator.id)
                .await
                .unwrap();
            storage
                .submit_evaluation_impl(new_evaluation(
                    assignment.id,
                    evaluator,
                    &code,
                    value,
                    Some("Keep it up"),
                ))
                .await
                .unwrap();
        }

        let period = AcademicPeriod::new("2024-2025", Semester::First);
        let records = storage
            .list_evaluation_records_impl(faculty.id, std::slice::from_ref(&period))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].population, Component::Student);
        assert_eq!(records[1].population, Component::Supervisor);
        assert_eq!(records[1].evaluator_name.as_deref(), Some("dean full"));
        assert!(records.iter().all(|r| !r.ratings.is_empty()));

        let scores = period_scores(&records, &period, Track::Dual);
        assert_eq!(scores.set_respondents, 1);
        assert_eq!(scores.sef_respondents, 1);
        assert!(scores.total_points.has_data());

        let other = AcademicPeriod::new("2023-2024", Semester::Second);
        assert!(
            storage
                .list_evaluation_records_impl(faculty.id, &[other])
                .await
                .unwrap()
                .is_empty()
        );

        let grouped = storage
            .list_evaluation_records_for_evaluatees_impl(&[faculty.id, dean.id], &period)
            .await
            .unwrap();
        assert_eq!(grouped.get(&faculty.id).map(Vec::len), Some(2));
        assert!(!grouped.contains_key(&dean.id));
    }

    #[tokio::test]
    async fn test_unreadable_rows_are_skipped() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = fixtures::user(&storage, "admin", UserRole::Admin, "Administrator", None, None).await;
        let faculty = fixtures::user(&storage, "prof", UserRole::Faculty, "Instructor I", None, None).await;
        let student = fixtures::user(&storage, "s1", UserRole::Student, "Student", None, None).await;

        let code = fixtures::code(&storage, UserRole::Student, faculty.id, admin.id).await;
        let (assignment, _) = storage
            .get_or_create_assignment_impl(code.id, student.id)
            .await
            .unwrap();
        storage
            .submit_evaluation_impl(new_evaluation(assignment.id, &student, &code, 4, None))
            .await
            .unwrap();

        let models = Evaluations::find().all(&storage.db).await.unwrap();
        assert_eq!(storage.build_records(models.clone()).await.unwrap().len(), 1);

        let mut bad_semester = models[0].clone();
        bad_semester.semester = "third".to_string();
        let mut bad_role = models[0].clone();
        bad_role.evaluator_role = "alumni".to_string();
        let records = storage
            .build_records(vec![bad_semester, bad_role, models[0].clone()])
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].period.semester, Semester::First);
        assert_eq!(records[0].population, Component::Student);
    }
}
