use crate::ai::GroqExplainer;
use secaudit_core::{Explainer, FixCache, NoopExplainer, ScanBudget};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};

/// 同时进行的仓库扫描数上限
const MAX_CONCURRENT_SCANS: usize = 2;

/// 修复建议缓存容量
const FIX_CACHE_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub explainer: Arc<dyn Explainer>,
    pub scan_permits: Arc<Semaphore>,
    pub fix_cache: Arc<Mutex<FixCache>>,
    pub budget: ScanBudget,
}

impl AppState {
    pub fn new() -> Self {
        // 解释服务按凭证注入：没有配置 key 时退化为空实现，核心检测不受影响
        let explainer: Arc<dyn Explainer> = match std::env::var("GROQ_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                tracing::info!("AI enrichment enabled (Groq)");
                Arc::new(GroqExplainer::new(key))
            }
            _ => {
                tracing::warn!("GROQ_API_KEY not set, AI enrichment disabled");
                Arc::new(NoopExplainer)
            }
        };

        Self {
            explainer,
            scan_permits: Arc::new(Semaphore::new(MAX_CONCURRENT_SCANS)),
            fix_cache: Arc::new(Mutex::new(FixCache::new(FIX_CACHE_CAPACITY))),
            budget: ScanBudget::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
