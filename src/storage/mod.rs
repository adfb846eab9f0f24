use std::collections::HashMap;
use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段须已是哈希值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 按角色与学院/专业查找用户（签字人）
    async fn find_users_by_role(
        &self,
        role: UserRole,
        college_id: Option<i64>,
        program_id: Option<i64>,
    ) -> Result<Vec<User>>;

    /// 学院
    async fn create_college(&self, req: CreateCollegeRequest) -> Result<College>;
    async fn get_college_by_id(&self, id: i64) -> Result<Option<College>>;
    async fn get_college_by_code(&self, code: &str) -> Result<Option<College>>;
    async fn list_colleges_with_pagination(
        &self,
        params: CollegeListParams,
    ) -> Result<CollegeListResponse>;
    async fn update_college(&self, id: i64, update: UpdateCollegeRequest)
    -> Result<Option<College>>;
    async fn delete_college(&self, id: i64) -> Result<bool>;

    /// 专业
    async fn create_program(&self, req: CreateProgramRequest) -> Result<Program>;
    async fn get_program_by_id(&self, id: i64) -> Result<Option<Program>>;
    async fn get_program_by_code(&self, code: &str) -> Result<Option<Program>>;
    async fn list_programs_with_pagination(
        &self,
        params: ProgramListParams,
    ) -> Result<ProgramListResponse>;
    async fn update_program(&self, id: i64, update: UpdateProgramRequest)
    -> Result<Option<Program>>;
    async fn delete_program(&self, id: i64) -> Result<bool>;

    /// 课程
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        params: SubjectListParams,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 评教码
    // 发放评教码，冲突时重新生成，最多尝试 max_attempts 次
    async fn issue_evaluation_code(
        &self,
        code: NewEvaluationCode,
        max_attempts: u32,
    ) -> Result<EvaluationCode>;
    async fn get_evaluation_code_by_id(&self, id: i64) -> Result<Option<EvaluationCode>>;
    async fn get_evaluation_code_by_code(&self, code: &str) -> Result<Option<EvaluationCode>>;
    async fn list_evaluation_codes_with_pagination(
        &self,
        query: EvaluationCodeListQuery,
    ) -> Result<EvaluationCodeListResponse>;
    async fn set_evaluation_code_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<EvaluationCode>>;

    /// 评价任务
    // 返回 (任务, 是否新建)；已存在时返回原任务
    async fn get_or_create_assignment(
        &self,
        code_id: i64,
        evaluator_id: i64,
    ) -> Result<(EvaluationAssignment, bool)>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<EvaluationAssignment>>;
    async fn get_pending_assignment(&self, assignment_id: i64)
    -> Result<Option<PendingAssignment>>;
    async fn list_pending_assignments(&self, evaluator_id: i64) -> Result<Vec<PendingAssignment>>;

    /// 评教
    // 单事务：写入评教与明细并将任务标记为已完成
    async fn submit_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation>;
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    async fn get_evaluation_ratings(&self, evaluation_id: i64) -> Result<Vec<RatingDetail>>;
    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse>;

    /// 报表取数
    // 被评人在指定学期范围内的评教记录（含评分明细）
    async fn list_evaluation_records(
        &self,
        evaluatee_id: i64,
        periods: &[AcademicPeriod],
    ) -> Result<Vec<EvaluationRecord>>;
    // 多个被评人单学期的评教记录
    async fn list_evaluation_records_for_evaluatees(
        &self,
        evaluatee_ids: &[i64],
        period: &AcademicPeriod,
    ) -> Result<HashMap<i64, Vec<EvaluationRecord>>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
