//! 评价任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code_id: i64,
    pub evaluator_id: i64,
    pub status: String,
    pub redeemed_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluation_codes::Entity",
        from = "Column::CodeId",
        to = "super::evaluation_codes::Column::Id"
    )]
    Code,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EvaluatorId",
        to = "super::users::Column::Id"
    )]
    Evaluator,
}

impl Related<super::evaluation_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Code.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::evaluation_codes::entities::EvaluationAssignment {
        use crate::models::evaluation_codes::entities::{AssignmentStatus, EvaluationAssignment};
        use chrono::{DateTime, Utc};

        EvaluationAssignment {
            id: self.id,
            code_id: self.code_id,
            evaluator_id: self.evaluator_id,
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Pending),
            redeemed_at: DateTime::<Utc>::from_timestamp(self.redeemed_at, 0).unwrap_or_default(),
            completed_at: self
                .completed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
