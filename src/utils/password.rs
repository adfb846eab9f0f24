use crate::config::AppConfig;
use crate::errors::FacultyEvalError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

const GENERATED_PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

fn configured_argon2() -> Result<Argon2<'static>, FacultyEvalError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| FacultyEvalError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, FacultyEvalError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = configured_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| FacultyEvalError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码（参数取自哈希串本身）
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// 生成满足密码策略的随机密码（初始管理员账号使用）
pub fn generate_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = rand::rng();
    loop {
        let candidate: String = (0..len)
            .map(|_| {
                GENERATED_PASSWORD_CHARSET[rng.random_range(0..GENERATED_PASSWORD_CHARSET.len())]
                    as char
            })
            .collect();
        if super::validate::password_issues(&candidate).is_empty() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Evaluate2025").unwrap();
        assert!(verify_password("Evaluate2025", &hash));
        assert!(!verify_password("evaluate2025", &hash));
        assert!(!verify_password("Evaluate2025", "not-a-hash"));
    }

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_password(16);
            assert_eq!(password.len(), 16);
            assert!(super::super::validate::password_issues(&password).is_empty());
        }
    }
}
