use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::scoring::Track;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student,         // 学生
    Faculty,         // 教师
    DepartmentChair, // 系主任
    Dean,            // 院长
    Vpaa,            // 学术副校长
    President,       // 校长
    Admin,           // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const FACULTY: &'static str = "faculty";
    pub const DEPARTMENT_CHAIR: &'static str = "department_chair";
    pub const DEAN: &'static str = "dean";
    pub const VPAA: &'static str = "vpaa";
    pub const PRESIDENT: &'static str = "president";
    pub const ADMIN: &'static str = "admin";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 可以发放评教码的角色
    pub fn issuer_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::DepartmentChair, &Self::Dean]
    }
    /// 可以查看报表的角色（学生除外）
    pub fn report_viewer_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Faculty,
            &Self::DepartmentChair,
            &Self::Dean,
            &Self::Vpaa,
            &Self::President,
            &Self::Admin,
        ]
    }
    /// 上级评价（SEF）的评价人角色
    pub fn supervisor_roles() -> &'static [&'static UserRole] {
        &[
            &Self::DepartmentChair,
            &Self::Dean,
            &Self::Vpaa,
            &Self::President,
        ]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[
            &Self::Student,
            &Self::Faculty,
            &Self::DepartmentChair,
            &Self::Dean,
            &Self::Vpaa,
            &Self::President,
            &Self::Admin,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => Self::STUDENT,
            UserRole::Faculty => Self::FACULTY,
            UserRole::DepartmentChair => Self::DEPARTMENT_CHAIR,
            UserRole::Dean => Self::DEAN,
            UserRole::Vpaa => Self::VPAA,
            UserRole::President => Self::PRESIDENT,
            UserRole::Admin => Self::ADMIN,
        }
    }

    /// 是否可以作为评教码的评价人角色
    pub fn can_evaluate(&self) -> bool {
        *self == UserRole::Student || Self::supervisor_roles().contains(&self)
    }

    /// 报表中的人员标签
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Student => "Student",
            UserRole::Faculty => "Faculty",
            UserRole::DepartmentChair => "Department Chair",
            UserRole::Dean => "Dean",
            UserRole::Vpaa => "VPAA",
            UserRole::President => "President",
            UserRole::Admin => "Administrator",
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, faculty, department_chair, dean, vpaa, president, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::STUDENT => Ok(UserRole::Student),
            Self::FACULTY => Ok(UserRole::Faculty),
            Self::DEPARTMENT_CHAIR => Ok(UserRole::DepartmentChair),
            Self::DEAN => Ok(UserRole::Dean),
            Self::VPAA => Ok(UserRole::Vpaa),
            Self::PRESIDENT => Ok(UserRole::President),
            Self::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub full_name: String,
    /// 职务（决定评分轨道）
    pub position: String,
    pub college_id: Option<i64>,
    pub program_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn track(&self) -> Track {
        Track::for_position(&self.position)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

// 报表与评教码中展示的被评人摘要
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserSummary {
    pub id: i64,
    pub full_name: String,
    pub position: String,
    pub role: UserRole,
    pub college_id: Option<i64>,
    pub program_id: Option<i64>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            position: user.position.clone(),
            role: user.role,
            college_id: user.college_id,
            program_id: user.program_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        for role in UserRole::all_roles() {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), **role);
        }
        assert!("teacher".parse::<UserRole>().is_err());

        let role: UserRole = serde_json::from_str("\"department_chair\"").unwrap();
        assert_eq!(role, UserRole::DepartmentChair);
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());
    }

    #[test]
    fn test_evaluator_roles() {
        assert!(UserRole::Student.can_evaluate());
        assert!(UserRole::Dean.can_evaluate());
        assert!(UserRole::President.can_evaluate());
        assert!(!UserRole::Faculty.can_evaluate());
        assert!(!UserRole::Admin.can_evaluate());
    }
}
