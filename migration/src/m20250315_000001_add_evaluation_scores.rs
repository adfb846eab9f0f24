use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite 的 ALTER TABLE 每次只能添加一列
        for column in [
            Evaluations::ScoreCommitment,
            Evaluations::ScoreKnowledge,
            Evaluations::ScoreTeaching,
            Evaluations::ScoreManagement,
            Evaluations::TotalScore,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Evaluations::Table)
                        .add_column(ColumnDef::new(column).double().null())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Evaluations::Table)
                    .add_column(ColumnDef::new(Evaluations::Comments).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Evaluations::Table)
                    .add_column(ColumnDef::new(Evaluations::EvaluatorName).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Evaluations::Table)
                    .add_column(
                        ColumnDef::new(Evaluations::EvaluatorPosition)
                            .string()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Evaluations::Table)
                    .add_column(
                        ColumnDef::new(Evaluations::EvaluationDate)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 逐项评分明细表
        manager
            .create_table(
                Table::create()
                    .table(EvaluationRatingsDetail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationRatingsDetail::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRatingsDetail::EvaluationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRatingsDetail::Category)
                            .string_len(1)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRatingsDetail::CriterionIndex)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRatingsDetail::Rating)
                            .integer()
                            .not_null()
                            .check(
                                Expr::col(EvaluationRatingsDetail::Rating)
                                    .gte(1)
                                    .and(Expr::col(EvaluationRatingsDetail::Rating).lte(5)),
                            ),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationRatingsDetail::Table,
                                EvaluationRatingsDetail::EvaluationId,
                            )
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluation_ratings_detail_item")
                    .table(EvaluationRatingsDetail::Table)
                    .col(EvaluationRatingsDetail::EvaluationId)
                    .col(EvaluationRatingsDetail::Category)
                    .col(EvaluationRatingsDetail::CriterionIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EvaluationRatingsDetail::Table)
                    .to_owned(),
            )
            .await?;

        for column in [
            Evaluations::EvaluationDate,
            Evaluations::EvaluatorPosition,
            Evaluations::EvaluatorName,
            Evaluations::Comments,
            Evaluations::TotalScore,
            Evaluations::ScoreManagement,
            Evaluations::ScoreTeaching,
            Evaluations::ScoreKnowledge,
            Evaluations::ScoreCommitment,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Evaluations::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    ScoreCommitment,
    ScoreKnowledge,
    ScoreTeaching,
    ScoreManagement,
    TotalScore,
    Comments,
    EvaluatorName,
    EvaluatorPosition,
    EvaluationDate,
}

#[derive(DeriveIden)]
enum EvaluationRatingsDetail {
    #[sea_orm(iden = "evaluation_ratings_detail")]
    Table,
    Id,
    EvaluationId,
    Category,
    CriterionIndex,
    Rating,
}
