//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod colleges;
#[cfg(test)]
pub(crate) mod fixtures;
mod evaluation_codes;
mod evaluations;
mod programs;
mod reports;
mod subjects;
mod users;

use crate::config::AppConfig;
use crate::errors::{FacultyEvalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 使用已有连接并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// 内存 SQLite（单连接，保证所有查询看到同一个库）
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::from_connection(db).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| FacultyEvalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout));
        // 内存库的连接关闭即丢失数据
        if !in_memory {
            pool = pool.idle_timeout(Duration::from_secs(300));
        } else {
            pool = pool.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool.connect_with(opt).await.map_err(|e| {
            FacultyEvalError::database_connection(format!("SQLite 连接失败: {e}"))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| FacultyEvalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(FacultyEvalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写操作错误：唯一约束与外键约束冲突单独归类
pub(crate) fn write_error(context: &str, err: DbErr) -> FacultyEvalError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            FacultyEvalError::conflict(format!("{context}: {detail}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            FacultyEvalError::conflict(format!("{context}: {detail}"))
        }
        _ => FacultyEvalError::database_operation(format!("{context}: {err}")),
    }
}

// Storage trait 实现
use crate::models::{
    colleges::{
        entities::College,
        requests::{CollegeListParams, CreateCollegeRequest, UpdateCollegeRequest},
        responses::CollegeListResponse,
    },
    evaluation_codes::{
        entities::{EvaluationAssignment, EvaluationCode, PendingAssignment},
        requests::{EvaluationCodeListQuery, NewEvaluationCode},
        responses::EvaluationCodeListResponse,
    },
    evaluations::{
        entities::{Evaluation, RatingDetail},
        requests::{EvaluationListQuery, NewEvaluation},
        responses::EvaluationListResponse,
    },
    programs::{
        entities::Program,
        requests::{CreateProgramRequest, ProgramListParams, UpdateProgramRequest},
        responses::ProgramListResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::scoring::AcademicPeriod;
use crate::scoring::annex::EvaluationRecord;
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn find_users_by_role(
        &self,
        role: UserRole,
        college_id: Option<i64>,
        program_id: Option<i64>,
    ) -> Result<Vec<User>> {
        self.find_users_by_role_impl(role, college_id, program_id)
            .await
    }

    // 学院模块
    async fn create_college(&self, req: CreateCollegeRequest) -> Result<College> {
        self.create_college_impl(req).await
    }

    async fn get_college_by_id(&self, id: i64) -> Result<Option<College>> {
        self.get_college_by_id_impl(id).await
    }

    async fn get_college_by_code(&self, code: &str) -> Result<Option<College>> {
        self.get_college_by_code_impl(code).await
    }

    async fn list_colleges_with_pagination(
        &self,
        params: CollegeListParams,
    ) -> Result<CollegeListResponse> {
        self.list_colleges_with_pagination_impl(params).await
    }

    async fn update_college(
        &self,
        id: i64,
        update: UpdateCollegeRequest,
    ) -> Result<Option<College>> {
        self.update_college_impl(id, update).await
    }

    async fn delete_college(&self, id: i64) -> Result<bool> {
        self.delete_college_impl(id).await
    }

    // 专业模块
    async fn create_program(&self, req: CreateProgramRequest) -> Result<Program> {
        self.create_program_impl(req).await
    }

    async fn get_program_by_id(&self, id: i64) -> Result<Option<Program>> {
        self.get_program_by_id_impl(id).await
    }

    async fn get_program_by_code(&self, code: &str) -> Result<Option<Program>> {
        self.get_program_by_code_impl(code).await
    }

    async fn list_programs_with_pagination(
        &self,
        params: ProgramListParams,
    ) -> Result<ProgramListResponse> {
        self.list_programs_with_pagination_impl(params).await
    }

    async fn update_program(
        &self,
        id: i64,
        update: UpdateProgramRequest,
    ) -> Result<Option<Program>> {
        self.update_program_impl(id, update).await
    }

    async fn delete_program(&self, id: i64) -> Result<bool> {
        self.delete_program_impl(id).await
    }

    // 课程模块
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn list_subjects_with_pagination(
        &self,
        params: SubjectListParams,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(params).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 评教码模块
    async fn issue_evaluation_code(
        &self,
        code: NewEvaluationCode,
        max_attempts: u32,
    ) -> Result<EvaluationCode> {
        self.issue_evaluation_code_impl(code, max_attempts).await
    }

    async fn get_evaluation_code_by_id(&self, id: i64) -> Result<Option<EvaluationCode>> {
        self.get_evaluation_code_by_id_impl(id).await
    }

    async fn get_evaluation_code_by_code(&self, code: &str) -> Result<Option<EvaluationCode>> {
        self.get_evaluation_code_by_code_impl(code).await
    }

    async fn list_evaluation_codes_with_pagination(
        &self,
        query: EvaluationCodeListQuery,
    ) -> Result<EvaluationCodeListResponse> {
        self.list_evaluation_codes_with_pagination_impl(query).await
    }

    async fn set_evaluation_code_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<EvaluationCode>> {
        self.set_evaluation_code_active_impl(id, is_active).await
    }

    // 评价任务模块
    async fn get_or_create_assignment(
        &self,
        code_id: i64,
        evaluator_id: i64,
    ) -> Result<(EvaluationAssignment, bool)> {
        self.get_or_create_assignment_impl(code_id, evaluator_id)
            .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<EvaluationAssignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn get_pending_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<PendingAssignment>> {
        self.get_pending_assignment_impl(assignment_id).await
    }

    async fn list_pending_assignments(&self, evaluator_id: i64) -> Result<Vec<PendingAssignment>> {
        self.list_pending_assignments_impl(evaluator_id).await
    }

    // 评教模块
    async fn submit_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.submit_evaluation_impl(evaluation).await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn get_evaluation_ratings(&self, evaluation_id: i64) -> Result<Vec<RatingDetail>> {
        self.get_evaluation_ratings_impl(evaluation_id).await
    }

    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        self.list_evaluations_with_pagination_impl(query).await
    }

    // 报表模块
    async fn list_evaluation_records(
        &self,
        evaluatee_id: i64,
        periods: &[AcademicPeriod],
    ) -> Result<Vec<EvaluationRecord>> {
        self.list_evaluation_records_impl(evaluatee_id, periods)
            .await
    }

    async fn list_evaluation_records_for_evaluatees(
        &self,
        evaluatee_ids: &[i64],
        period: &AcademicPeriod,
    ) -> Result<HashMap<i64, Vec<EvaluationRecord>>> {
        self.list_evaluation_records_for_evaluatees_impl(evaluatee_ids, period)
            .await
    }
}
