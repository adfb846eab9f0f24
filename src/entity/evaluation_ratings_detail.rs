//! 评教单项评分明细实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_ratings_detail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluation_id: i64,
    /// `A`–`D`
    pub category: String,
    pub criterion_index: i32,
    pub rating: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluations::Entity",
        from = "Column::EvaluationId",
        to = "super::evaluations::Column::Id"
    )]
    Evaluation,
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 无法识别的类别或越界的值返回 None
    pub fn into_rating_detail(self) -> Option<crate::models::evaluations::entities::RatingDetail> {
        use crate::models::evaluations::entities::RatingDetail;
        use crate::scoring::CategoryCode;

        Some(RatingDetail {
            category: self.category.parse::<CategoryCode>().ok()?,
            criterion_index: usize::try_from(self.criterion_index).ok()?,
            rating: u8::try_from(self.rating).ok()?,
        })
    }
}
