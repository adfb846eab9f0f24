use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 学院表
        manager
            .create_table(
                Table::create()
                    .table(Colleges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Colleges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Colleges::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Colleges::Name).string().not_null())
                    .col(ColumnDef::new(Colleges::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Colleges::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 专业表
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Programs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Programs::CollegeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Programs::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(ColumnDef::new(Programs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Programs::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Programs::Table, Programs::CollegeId)
                            .to(Colleges::Table, Colleges::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::ProgramId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Subjects::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Title).string().not_null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Position).string().not_null())
                    .col(ColumnDef::new(Users::CollegeId).big_integer().null())
                    .col(ColumnDef::new(Users::ProgramId).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::CollegeId)
                            .to(Colleges::Table, Colleges::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 评教码表
        manager
            .create_table(
                Table::create()
                    .table(EvaluationCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::Code)
                            .string_len(7)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::EvaluatorRole)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::SubjectId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(EvaluationCodes::Section).string().null())
                    .col(
                        ColumnDef::new(EvaluationCodes::SchoolYear)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationCodes::Semester).string().not_null())
                    .col(
                        ColumnDef::new(EvaluationCodes::RubricVersion)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::IssuedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(EvaluationCodes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationCodes::Table, EvaluationCodes::EvaluateeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationCodes::Table, EvaluationCodes::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 评教任务表（兑换评教码后生成）
        manager
            .create_table(
                Table::create()
                    .table(EvaluationAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::CodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::RedeemedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationAssignments::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationAssignments::Table, EvaluationAssignments::CodeId)
                            .to(EvaluationCodes::Table, EvaluationCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EvaluationAssignments::Table,
                                EvaluationAssignments::EvaluatorId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 评教记录表（评分列由后续迁移添加）
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::AssignmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::EvaluatorRole).string().not_null())
                    .col(ColumnDef::new(Evaluations::SubjectId).big_integer().null())
                    .col(ColumnDef::new(Evaluations::Section).string().null())
                    .col(ColumnDef::new(Evaluations::SchoolYear).string().not_null())
                    .col(ColumnDef::new(Evaluations::Semester).string().not_null())
                    .col(ColumnDef::new(Evaluations::RubricVersion).string().not_null())
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::AssignmentId)
                            .to(EvaluationAssignments::Table, EvaluationAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::EvaluateeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluation_assignments_code_evaluator")
                    .table(EvaluationAssignments::Table)
                    .col(EvaluationAssignments::CodeId)
                    .col(EvaluationAssignments::EvaluatorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluation_codes_evaluatee_period")
                    .table(EvaluationCodes::Table)
                    .col(EvaluationCodes::EvaluateeId)
                    .col(EvaluationCodes::SchoolYear)
                    .col(EvaluationCodes::Semester)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_evaluatee_period")
                    .table(Evaluations::Table)
                    .col(Evaluations::EvaluateeId)
                    .col(Evaluations::SchoolYear)
                    .col(Evaluations::Semester)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_college_program")
                    .table(Users::Table)
                    .col(Users::CollegeId)
                    .col(Users::ProgramId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Colleges::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Colleges {
    #[sea_orm(iden = "colleges")]
    Table,
    Id,
    Code,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Programs {
    #[sea_orm(iden = "programs")]
    Table,
    Id,
    CollegeId,
    Code,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    ProgramId,
    Code,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    FullName,
    Position,
    CollegeId,
    ProgramId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EvaluationCodes {
    #[sea_orm(iden = "evaluation_codes")]
    Table,
    Id,
    Code,
    EvaluatorRole,
    EvaluateeId,
    SubjectId,
    Section,
    SchoolYear,
    Semester,
    RubricVersion,
    IssuedBy,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EvaluationAssignments {
    #[sea_orm(iden = "evaluation_assignments")]
    Table,
    Id,
    CodeId,
    EvaluatorId,
    Status,
    RedeemedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    AssignmentId,
    EvaluatorId,
    EvaluateeId,
    EvaluatorRole,
    SubjectId,
    Section,
    SchoolYear,
    Semester,
    RubricVersion,
    CreatedAt,
}
