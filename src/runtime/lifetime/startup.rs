use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{FacultyEvalError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::{generate_password, hash_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)
        .ok_or_else(|| FacultyEvalError::cache_plugin_not_found(name))?;
    constructor().await.map(Arc::from)
}

/// 按 `cache.type` 创建缓存，失败时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Cache backend '{}' initialized", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!(
                "Cache backend '{}' unavailable ({}), falling back to {}",
                cache_type,
                e.format_simple(),
                FALLBACK_CACHE
            );
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 数据库中没有任何用户时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("No users found, creating default admin account"),
        Ok(count) => {
            debug!("{} user(s) present, skipping admin seed", count);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let seed = &AppConfig::get().admin;
    let password = if seed.password.is_empty() {
        let generated = generate_password(16);
        warn!("admin.password not set, generated admin password: {}", generated);
        generated
    } else {
        seed.password.clone()
    };

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: seed.username.clone(),
        email: seed.email.clone(),
        password: password_hash,
        role: UserRole::Admin,
        full_name: "Administrator".to_string(),
        position: "System Administrator".to_string(),
        college_id: None,
        program_id: None,
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account '{}' created (ID: {})",
            user.username, user.id
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备存储（含迁移）、默认管理员与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已安装时返回 Err，可以忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;

    Ok(StartupContext { storage, cache })
}
