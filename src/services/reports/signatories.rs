use std::sync::Arc;

use crate::errors::Result;
use crate::models::reports::responses::Signatory;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

async fn first_with_role(
    storage: &Arc<dyn Storage>,
    role: UserRole,
    college_id: Option<i64>,
    program_id: Option<i64>,
) -> Result<Option<User>> {
    Ok(storage
        .find_users_by_role(role, college_id, program_id)
        .await?
        .into_iter()
        .next())
}

fn signatory(title: &str, user: Option<User>) -> Signatory {
    Signatory {
        title: title.to_string(),
        name: user.as_ref().map(|u| u.full_name.clone()),
        position: user.map(|u| u.position),
    }
}

/// Annex D 签字栏：系主任、院长、学术副校长、校长
///
/// 系主任与院长按被评人的专业和学院匹配，找不到时名字留空。
pub async fn resolve_signatories(
    storage: &Arc<dyn Storage>,
    evaluatee: &User,
) -> Result<Vec<Signatory>> {
    let chair = match evaluatee.program_id {
        Some(program_id) => {
            first_with_role(storage, UserRole::DepartmentChair, None, Some(program_id)).await?
        }
        None => None,
    };
    let dean = match evaluatee.college_id {
        Some(college_id) => first_with_role(storage, UserRole::Dean, Some(college_id), None).await?,
        None => None,
    };
    let vpaa = first_with_role(storage, UserRole::Vpaa, None, None).await?;
    let president = first_with_role(storage, UserRole::President, None, None).await?;

    Ok(vec![
        signatory("Program Chair", chair),
        signatory("Dean", dean),
        signatory("Vice President for Academic Affairs", vpaa),
        signatory("President", president),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, fixtures};

    #[tokio::test]
    async fn test_signatories_follow_evaluatee_directory() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let ccs = fixtures::college(&storage, "CCS").await;
        let coe = fixtures::college(&storage, "COE").await;
        let bsit = fixtures::program(&storage, ccs.id, "BSIT").await;

        let faculty = fixtures::user(
            &storage,
            "faculty1",
            UserRole::Faculty,
            "Instructor I",
            Some(ccs.id),
            Some(bsit.id),
        )
        .await;
        fixtures::user(&storage, "chair1", UserRole::DepartmentChair, "Program Chair", Some(ccs.id), Some(bsit.id)).await;
        fixtures::user(&storage, "dean_coe", UserRole::Dean, "Dean", Some(coe.id), None).await;
        fixtures::user(&storage, "vpaa1", UserRole::Vpaa, "VPAA", None, None).await;

        let storage: Arc<dyn Storage> = Arc::new(storage);
        let signatories = resolve_signatories(&storage, &faculty).await.unwrap();

        assert_eq!(signatories.len(), 4);
        assert!(signatories[0].name.is_some());
        // 其他学院的院长不能签字
        assert!(signatories[1].name.is_none());
        assert!(signatories[2].name.is_some());
        assert!(signatories[3].name.is_none());
    }
}
