// Audit pipeline - 审计管线
// fetch → sample → detect → enrich → summarize；只有获取阶段允许让整体失败

use crate::ai::{enhance_findings, Explainer};
use crate::repo::{fetch_repository, FetchError};
use crate::sampler::{sample_repository, ScanBudget};
use crate::scanner::manager::ScannerManager;
use crate::scanner::{CodeFile, FindingMap, ScanSummary};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 一次完整仓库审计的报告
///
/// Constructed once per scan invocation and returned to the caller; nothing
/// is persisted across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub repo_url: String,
    pub scan_time_seconds: f64,
    pub files_scanned: usize,
    pub total_files_discovered: usize,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub summary: ScanSummary,
    pub findings: FindingMap,
}

/// 单文件扫描的结果（便捷入口，不经过获取与采样）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetReport {
    pub filename: String,
    pub summary: ScanSummary,
    pub findings: FindingMap,
}

/// 审计一个远端仓库
///
/// 获取失败是唯一会返回 Err 的路径；克隆成功之后的任何内部错误都降级为
/// 空的/部分的报告，绝不向调用方抛出。临时检出随 guard 在所有路径上清理。
pub async fn audit_repository(
    repo_url: &str,
    budget: &ScanBudget,
    explainer: &dyn Explainer,
    clone_timeout: Duration,
) -> Result<AuditReport, FetchError> {
    let start = Instant::now();

    let checkout = fetch_repository(repo_url, clone_timeout).await?;
    let report = scan_checkout(repo_url, checkout.path(), budget, explainer, start).await;

    Ok(report)
}

/// 扫描一个已经在本地的检出目录
pub async fn scan_checkout(
    repo_url: &str,
    path: &Path,
    budget: &ScanBudget,
    explainer: &dyn Explainer,
    start: Instant,
) -> AuditReport {
    let sample = match sample_repository(path, budget).await {
        Ok(sample) => sample,
        Err(e) => {
            tracing::error!("sampling of {} failed: {}", repo_url, e);
            return empty_report(
                repo_url,
                start,
                "The repository could not be analyzed; returning an empty result.",
            );
        }
    };

    let files_scanned = sample.files_loaded();
    let total_files_discovered = sample.total_discovered;
    let truncated = sample.truncated;

    let manager = ScannerManager::with_default_scanners();
    let mut findings = manager.scan_files(Arc::new(sample.files)).await;

    enhance_findings(&mut findings, explainer).await;

    let summary = ScanSummary::from_findings(&findings);
    let notice = truncated.then(|| {
        format!(
            "Scan truncated: analyzed {} of {} discovered files.",
            files_scanned, total_files_discovered
        )
    });

    AuditReport {
        repo_url: repo_url.to_string(),
        scan_time_seconds: round2(start.elapsed().as_secs_f64()),
        files_scanned,
        total_files_discovered,
        truncated,
        notice,
        summary,
        findings,
    }
}

/// 扫描一段内存中的代码（无获取、无采样、无 AI 增强）
pub async fn scan_snippet(code: &str, filename: &str) -> SnippetReport {
    let extension = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let file = CodeFile {
        path: filename.to_string(),
        content: code.to_string(),
        extension,
    };

    let manager = ScannerManager::with_default_scanners();
    let findings = manager.scan_files(Arc::new(vec![file])).await;
    let summary = ScanSummary::from_findings(&findings);

    SnippetReport {
        filename: filename.to_string(),
        summary,
        findings,
    }
}

fn empty_report(repo_url: &str, start: Instant, notice: &str) -> AuditReport {
    AuditReport {
        repo_url: repo_url.to_string(),
        scan_time_seconds: round2(start.elapsed().as_secs_f64()),
        files_scanned: 0,
        total_files_discovered: 0,
        truncated: true,
        notice: Some(notice.to_string()),
        summary: ScanSummary::default(),
        findings: FindingMap::new(),
    }
}

fn round2(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snippet_scan_reports_secret() {
        let report = scan_snippet("password = \"supersecret123\"\n", "config.py").await;

        assert_eq!(report.summary.total_findings, 1);
        assert_eq!(report.summary.secrets_detected, 1);
        assert_eq!(report.findings.secrets_detected[0].file, "config.py");
    }

    #[tokio::test]
    async fn snippet_scan_of_clean_code_is_empty() {
        let report = scan_snippet("const x = 1;\n", "main.js").await;
        assert_eq!(report.summary.total_findings, 0);
    }

    #[test]
    fn round2_rounds_to_hundredths() {
        assert_eq!(round2(1.234_56), 1.23);
        assert_eq!(round2(0.005), 0.01);
    }
}
