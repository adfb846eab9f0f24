//! 评教码实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub evaluator_role: String,
    pub evaluatee_id: i64,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub school_year: String,
    pub semester: String,
    pub rubric_version: String,
    pub issued_by: i64,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EvaluateeId",
        to = "super::users::Column::Id"
    )]
    Evaluatee,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::evaluation_assignments::Entity")]
    Assignments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluatee.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::evaluation_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_evaluation_code(self) -> crate::models::evaluation_codes::entities::EvaluationCode {
        use crate::models::evaluation_codes::entities::EvaluationCode;
        use crate::models::users::entities::UserRole;
        use crate::scoring::{RubricVersion, Semester};
        use chrono::{DateTime, Utc};

        EvaluationCode {
            id: self.id,
            code: self.code,
            evaluator_role: self
                .evaluator_role
                .parse::<UserRole>()
                .unwrap_or(UserRole::Student),
            evaluatee_id: self.evaluatee_id,
            subject_id: self.subject_id,
            section: self.section,
            school_year: self.school_year,
            semester: self.semester.parse::<Semester>().unwrap_or(Semester::First),
            rubric_version: self
                .rubric_version
                .parse::<RubricVersion>()
                .unwrap_or(RubricVersion::New),
            issued_by: self.issued_by,
            is_active: self.is_active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
