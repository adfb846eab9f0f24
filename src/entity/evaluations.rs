//! 评教实体（提交后只读）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub assignment_id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub evaluator_role: String,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: String,
    pub rubric_version: String,
    pub score_commitment: Option<f64>,
    pub score_knowledge: Option<f64>,
    pub score_teaching: Option<f64>,
    pub score_management: Option<f64>,
    pub total_score: Option<f64>,
    pub comments: Option<String>,
    pub evaluator_name: Option<String>,
    pub evaluator_position: Option<String>,
    pub evaluation_date: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluation_assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::evaluation_assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::evaluation_ratings_detail::Entity")]
    Ratings,
}

impl Related<super::evaluation_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::evaluation_ratings_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::Evaluation;
        use crate::models::users::entities::UserRole;
        use crate::scoring::{RubricVersion, Score, Semester};
        use chrono::{DateTime, Utc};

        let evaluation_date = self.evaluation_date.unwrap_or(self.created_at);

        Evaluation {
            id: self.id,
            assignment_id: Some(self.assignment_id),
            evaluator_id: Some(self.evaluator_id),
            evaluatee_id: self.evaluatee_id,
            evaluator_role: self
                .evaluator_role
                .parse::<UserRole>()
                .unwrap_or(UserRole::Student),
            subject_id: self.subject_id,
            section: self.section,
            school_year: self.school_year,
            semester: self.semester.parse::<Semester>().unwrap_or(Semester::First),
            rubric_version: self
                .rubric_version
                .parse::<RubricVersion>()
                .unwrap_or(RubricVersion::New),
            score_commitment: Score::from(self.score_commitment),
            score_knowledge: Score::from(self.score_knowledge),
            score_teaching: Score::from(self.score_teaching),
            score_management: Score::from(self.score_management),
            total_score: Score::from(self.total_score),
            comments: self.comments,
            evaluator_name: self.evaluator_name.unwrap_or_default(),
            evaluator_position: self.evaluator_position.unwrap_or_default(),
            evaluation_date: DateTime::<Utc>::from_timestamp(evaluation_date, 0).unwrap_or_default(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
