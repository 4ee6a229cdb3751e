use super::auth::AuthScanner;
use super::injection::SqlInjectionScanner;
use super::secrets::SecretScanner;
use super::{CodeFile, Finding, FindingMap, Scanner};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;

/// 检测编排器：并发运行已注册的检测器并聚合结果
///
/// Every registered scanner owns exactly one category, so the aggregation
/// step never contends on a key. A scanner that panics is captured as a
/// tagged failure and contributes an empty category; siblings keep running.
#[derive(Clone)]
pub struct ScannerManager {
    scanners: Vec<Arc<dyn Scanner>>,
}

impl ScannerManager {
    pub fn new() -> Self {
        Self {
            scanners: Vec::new(),
        }
    }

    /// 注册默认的三个检测器
    pub fn with_default_scanners() -> Self {
        let mut manager = Self::new();
        manager.register_scanner(SecretScanner::new());
        manager.register_scanner(SqlInjectionScanner::new());
        manager.register_scanner(AuthScanner::new());
        manager
    }

    pub fn register_scanner<S: Scanner + 'static>(&mut self, scanner: S) {
        self.scanners.push(Arc::new(scanner));
    }

    /// 对同一份只读文件集并发运行所有检测器
    pub async fn scan_files(&self, files: Arc<Vec<CodeFile>>) -> FindingMap {
        let mut set = JoinSet::new();

        for scanner in &self.scanners {
            let scanner = Arc::clone(scanner);
            let files = Arc::clone(&files);

            set.spawn(async move {
                let name = scanner.name();
                let category = scanner.category();
                let outcome: Result<Vec<Finding>, _> =
                    std::panic::catch_unwind(AssertUnwindSafe(|| scanner.scan(&files)));
                (name, category, outcome)
            });
        }

        let mut map = FindingMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, category, Ok(findings))) => {
                    map.extend(category, findings);
                }
                Ok((name, category, Err(_))) => {
                    tracing::error!(
                        "scanner {} panicked, category {} reported empty",
                        name,
                        category.key()
                    );
                }
                Err(e) => {
                    tracing::error!("scanner task failed to join: {}", e);
                }
            }
        }

        map
    }
}

impl Default for ScannerManager {
    fn default() -> Self {
        Self::with_default_scanners()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Category;

    struct PanickingScanner;

    impl Scanner for PanickingScanner {
        fn name(&self) -> &'static str {
            "PanickingScanner"
        }

        fn category(&self) -> Category {
            Category::SqlInjection
        }

        fn scan(&self, _files: &[CodeFile]) -> Vec<Finding> {
            panic!("detector bug");
        }
    }

    fn vulnerable_files() -> Arc<Vec<CodeFile>> {
        Arc::new(vec![
            CodeFile {
                path: "config.py".to_string(),
                content: "password = \"supersecret123\"\n".to_string(),
                extension: "py".to_string(),
            },
            CodeFile {
                path: "db.py".to_string(),
                content: "query = \"SELECT * FROM users WHERE id = \" + user_id\n".to_string(),
                extension: "py".to_string(),
            },
            CodeFile {
                path: "routes.py".to_string(),
                content: "@app.post(\"/admin/delete_user\")\ndef delete_user():\n    pass\n"
                    .to_string(),
                extension: "py".to_string(),
            },
        ])
    }

    #[tokio::test]
    async fn aggregates_all_three_categories() {
        let manager = ScannerManager::with_default_scanners();
        let findings = manager.scan_files(vulnerable_files()).await;

        assert_eq!(findings.secrets_detected.len(), 1);
        assert_eq!(findings.sql_injection.len(), 1);
        assert_eq!(findings.missing_auth.len(), 1);
        assert_eq!(findings.total(), 3);
    }

    #[tokio::test]
    async fn panicking_scanner_degrades_to_empty_category() {
        let mut manager = ScannerManager::new();
        manager.register_scanner(SecretScanner::new());
        manager.register_scanner(PanickingScanner);
        manager.register_scanner(AuthScanner::new());

        let findings = manager.scan_files(vulnerable_files()).await;

        assert_eq!(findings.secrets_detected.len(), 1);
        assert!(findings.sql_injection.is_empty());
        assert_eq!(findings.missing_auth.len(), 1);
    }

    #[tokio::test]
    async fn repeated_scans_are_identical() {
        let manager = ScannerManager::with_default_scanners();
        let files = vulnerable_files();

        let first = manager.scan_files(Arc::clone(&files)).await;
        let second = manager.scan_files(files).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_file_set_yields_empty_map() {
        let manager = ScannerManager::with_default_scanners();
        let findings = manager.scan_files(Arc::new(Vec::new())).await;
        assert_eq!(findings.total(), 0);
    }
}
