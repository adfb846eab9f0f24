//! 存储层测试数据

use super::SeaOrmStorage;
use crate::models::colleges::{entities::College, requests::CreateCollegeRequest};
use crate::models::evaluation_codes::{entities::EvaluationCode, requests::NewEvaluationCode};
use crate::models::programs::{entities::Program, requests::CreateProgramRequest};
use crate::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use crate::scoring::{RubricVersion, Semester};

pub async fn college(storage: &SeaOrmStorage, code: &str) -> College {
    storage
        .create_college_impl(CreateCollegeRequest {
            code: code.to_string(),
            name: format!("College {code}"),
        })
        .await
        .unwrap()
}

pub async fn program(storage: &SeaOrmStorage, college_id: i64, code: &str) -> Program {
    storage
        .create_program_impl(CreateProgramRequest {
            college_id,
            code: code.to_string(),
            name: format!("Program {code}"),
        })
        .await
        .unwrap()
}

pub async fn user(
    storage: &SeaOrmStorage,
    username: &str,
    role: UserRole,
    position: &str,
    college_id: Option<i64>,
    program_id: Option<i64>,
) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            password: "not-a-real-hash".to_string(),
            role,
            full_name: format!("{username} full"),
            position: position.to_string(),
            college_id,
            program_id,
        })
        .await
        .unwrap()
}

pub async fn code(
    storage: &SeaOrmStorage,
    evaluator_role: UserRole,
    evaluatee_id: i64,
    issued_by: i64,
) -> EvaluationCode {
    storage
        .issue_evaluation_code_impl(
            NewEvaluationCode {
                evaluator_role,
                evaluatee_id,
                subject_id: None,
                section: Some("A".to_string()),
                school_year: "2024-2025".to_string(),
                semester: Semester::First,
                rubric_version: RubricVersion::New,
                issued_by,
            },
            5,
        )
        .await
        .unwrap()
}
