//! 报表缓存
//!
//! 每个被评人有一个纪元值，提交评教或修改被评人资料时更新；报表键包含纪元，
//! 旧纪元的报表不再被命中，随 TTL 自然过期。
//! 纪元丢失（过期或被淘汰）时生成新纪元，此前缓存的报表全部失效。

use actix_web::HttpRequest;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;

pub fn report_epoch_key(evaluatee_id: i64) -> String {
    format!("report_epoch:{evaluatee_id}")
}

fn new_epoch() -> String {
    chrono::Utc::now().timestamp_micros().to_string()
}

/// 纪元与报表使用同一 TTL 写入
async fn current_epoch(cache: &dyn ObjectCache, evaluatee_id: i64, ttl: u64) -> String {
    match cache.get_raw(&report_epoch_key(evaluatee_id)).await {
        CacheResult::Found(epoch) => epoch,
        _ => {
            let epoch = new_epoch();
            cache
                .insert_raw(report_epoch_key(evaluatee_id), epoch.clone(), ttl)
                .await;
            epoch
        }
    }
}

pub async fn bump_report_epoch(cache: &dyn ObjectCache, evaluatee_id: i64, ttl: u64) {
    cache
        .insert_raw(report_epoch_key(evaluatee_id), new_epoch(), ttl)
        .await;
    tracing::debug!("Report epoch bumped for evaluatee {}", evaluatee_id);
}

/// 被评人的评教或资料变更后调用；缓存不可用时只记录日志
pub(crate) async fn invalidate_reports(request: &HttpRequest, evaluatee_id: i64) {
    match crate::services::cache_from_request(request) {
        Ok(cache) => {
            let ttl = AppConfig::get().evaluation.report_cache_ttl;
            bump_report_epoch(cache.as_ref(), evaluatee_id, ttl).await;
        }
        Err(_) => tracing::warn!("Report cache for evaluatee {} not invalidated", evaluatee_id),
    }
}

pub(crate) struct ReportCache {
    cache: Arc<dyn ObjectCache>,
    key: String,
    ttl: u64,
}

impl ReportCache {
    pub async fn open(
        cache: Arc<dyn ObjectCache>,
        kind: &str,
        evaluatee_id: i64,
        params: &str,
        ttl: u64,
    ) -> Self {
        let epoch = current_epoch(cache.as_ref(), evaluatee_id, ttl).await;
        Self {
            key: format!("report:{kind}:{evaluatee_id}:{epoch}:{params}"),
            cache,
            ttl,
        }
    }

    pub async fn get(&self) -> Option<serde_json::Value> {
        match self.cache.get_raw(&self.key).await {
            CacheResult::Found(json) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Discarding unreadable cached report {}: {}", self.key, e);
                    None
                }
            },
            _ => None,
        }
    }

    pub async fn put<T: Serialize>(&self, report: &T) {
        match serde_json::to_string(report) {
            Ok(json) => self.cache.insert_raw(self.key.clone(), json, self.ttl).await,
            Err(e) => tracing::warn!("Failed to serialize report {}: {}", self.key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;

    #[tokio::test]
    async fn test_epoch_bump_invalidates_report() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));

        let before = ReportCache::open(cache.clone(), "annex_c", 4, "2024-2025:first", 60).await;
        before.put(&serde_json::json!({ "respondents": 2 })).await;
        assert_eq!(
            before.get().await,
            Some(serde_json::json!({ "respondents": 2 }))
        );

        bump_report_epoch(cache.as_ref(), 4, 60).await;
        let after = ReportCache::open(cache.clone(), "annex_c", 4, "2024-2025:first", 60).await;
        assert_eq!(after.get().await, None);

        // 其他被评人的报表不受影响
        let other = ReportCache::open(cache.clone(), "annex_c", 5, "2024-2025:first", 60).await;
        other.put(&serde_json::json!({ "respondents": 1 })).await;
        bump_report_epoch(cache.as_ref(), 4, 60).await;
        assert!(other.get().await.is_some());
    }

    #[tokio::test]
    async fn test_lost_epoch_never_revives_old_report() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 1));

        let stale = ReportCache::open(cache.clone(), "annex_d", 8, "2024-2025:second", 60).await;
        stale.put(&serde_json::json!({ "total": 40.0 })).await;

        // 新提交后纪元在报表之前过期
        bump_report_epoch(cache.as_ref(), 8, 1).await;
        std::thread::sleep(std::time::Duration::from_millis(1200));
        assert_eq!(
            cache.get_raw(&report_epoch_key(8)).await,
            CacheResult::NotFound
        );

        let reopened =
            ReportCache::open(cache.clone(), "annex_d", 8, "2024-2025:second", 60).await;
        assert_eq!(reopened.get().await, None);

        // 纪元被淘汰时同样不会回到旧报表
        reopened.put(&serde_json::json!({ "total": 48.0 })).await;
        cache.remove(&report_epoch_key(8)).await;
        let after_evict =
            ReportCache::open(cache.clone(), "annex_d", 8, "2024-2025:second", 60).await;
        assert_eq!(after_evict.get().await, None);
    }
}
