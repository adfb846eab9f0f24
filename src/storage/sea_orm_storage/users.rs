use super::{SeaOrmStorage, write_error};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{FacultyEvalError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            full_name: Set(req.full_name),
            position: Set(req.position),
            college_id: Set(req.college_id),
            program_id: Set(req.program_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error("创建用户失败", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FullName.contains(&escaped)),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(college_id) = query.college_id {
            select = select.filter(Column::CollegeId.eq(college_id));
        }

        if let Some(program_id) = query.program_id {
            select = select.filter(Column::ProgramId.eq(program_id));
        }

        if query.evaluatees_only {
            select = select.filter(
                Column::Role.is_not_in([UserRole::Student.to_string(), UserRole::Admin.to_string()]),
            );
        }

        // 排序
        select = select
            .order_by_asc(Column::FullName)
            .order_by_asc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FacultyEvalError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }

        if let Some(position) = update.position {
            model.position = Set(position);
        }

        if let Some(college_id) = update.college_id {
            model.college_id = Set(Some(college_id));
        }

        if let Some(program_id) = update.program_id {
            model.program_id = Set(Some(program_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| write_error("更新用户失败", e))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| write_error("删除用户失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 按角色查找活跃用户，可按学院/专业限定
    pub async fn find_users_by_role_impl(
        &self,
        role: UserRole,
        college_id: Option<i64>,
        program_id: Option<i64>,
    ) -> Result<Vec<User>> {
        let mut select = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .filter(Column::Status.eq(UserStatus::Active.to_string()));

        if let Some(college_id) = college_id {
            select = select.filter(Column::CollegeId.eq(college_id));
        }
        if let Some(program_id) = program_id {
            select = select.filter(Column::ProgramId.eq(program_id));
        }

        let users = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| FacultyEvalError::database_operation(format!("按角色查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_user_crud_and_filters() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let college = fixtures::college(&storage, "CCS").await;
        let program = fixtures::program(&storage, college.id, "BSIT").await;

        let faculty = fixtures::user(
            &storage,
            "jdelacruz",
            UserRole::Faculty,
            "Assistant Professor",
            Some(college.id),
            Some(program.id),
        )
        .await;
        fixtures::user(&storage, "student01", UserRole::Student, "Student", Some(college.id), Some(program.id)).await;

        let found = storage
            .get_user_by_username_or_email_impl("jdelacruz@example.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, faculty.id);

        let listed = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Faculty),
                college_id: Some(college.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
        assert_eq!(listed.items[0].username, "jdelacruz");

        let evaluatees = storage
            .list_users_with_pagination_impl(UserListQuery {
                college_id: Some(college.id),
                evaluatees_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(evaluatees.pagination.total, 1);

        let updated = storage
            .update_user_impl(
                faculty.id,
                UpdateUserRequest {
                    email: None,
                    password: None,
                    role: None,
                    status: None,
                    full_name: None,
                    position: Some("Department Chairperson".into()),
                    college_id: None,
                    program_id: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.position, "Department Chairperson");
        assert_eq!(updated.college_id, Some(college.id));

        assert!(storage.delete_user_impl(faculty.id).await.unwrap());
        assert!(storage.get_user_by_id_impl(faculty.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        fixtures::user(&storage, "msantos", UserRole::Dean, "Dean", None, None).await;

        let err = storage
            .create_user_impl(CreateUserRequest {
                username: "msantos".into(),
                email: "other@example.edu".into(),
                password: "hash".into(),
                role: UserRole::Faculty,
                full_name: "M. Santos".into(),
                position: "Instructor".into(),
                college_id: None,
                program_id: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E009");
    }

    #[tokio::test]
    async fn test_find_users_by_role_scope() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let ccs = fixtures::college(&storage, "CCS").await;
        let cba = fixtures::college(&storage, "CBA").await;
        let dean = fixtures::user(&storage, "deanccs", UserRole::Dean, "Dean", Some(ccs.id), None).await;
        fixtures::user(&storage, "deancba", UserRole::Dean, "Dean", Some(cba.id), None).await;

        let found = storage
            .find_users_by_role_impl(UserRole::Dean, Some(ccs.id), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, dean.id);
    }
}
