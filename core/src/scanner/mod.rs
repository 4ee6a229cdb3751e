// Scanner module - 扫描器模块
// 定义检测器的核心接口和共享数据模型

pub mod auth;
pub mod injection;
pub mod manager;
pub mod secrets;

use serde::{Deserialize, Serialize};

/// 一个已加载的源代码文件
///
/// Owned by the scan pipeline for the duration of one scan; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeFile {
    /// Path relative to the repository root
    pub path: String,
    pub content: String,
    /// Lowercase extension without the leading dot
    pub extension: String,
}

/// 检测器所属的结果类别
///
/// Each detector owns exactly one category key in the aggregated map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    SecretsDetected,
    SqlInjection,
    MissingAuth,
}

impl Category {
    pub fn key(&self) -> &'static str {
        match self {
            Category::SecretsDetected => "secrets_detected",
            Category::SqlInjection => "sql_injection",
            Category::MissingAuth => "missing_auth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    #[serde(rename = "Hardcoded Secret")]
    Secret,
    #[serde(rename = "SQL Injection")]
    SqlInjection,
    #[serde(rename = "Missing Authentication")]
    MissingAuth,
}

impl FindingKind {
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::Secret => "Hardcoded Secret",
            FindingKind::SqlInjection => "SQL Injection",
            FindingKind::MissingAuth => "Missing Authentication",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// 漏洞发现结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    /// 1-based; 0 when the finding is not line-specific
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub subtype: String,
    pub severity: Severity,
    /// Masked/truncated snippet; for secrets this never contains the raw value
    pub evidence: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_risk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_exploit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_fix: Option<String>,
}

/// 扫描器 trait - 所有检测器都需要实现此接口
pub trait Scanner: Send + Sync {
    /// 返回扫描器名称
    fn name(&self) -> &'static str;

    /// The single result category this detector owns
    fn category(&self) -> Category;

    /// 扫描整个文件集合
    fn scan(&self, files: &[CodeFile]) -> Vec<Finding>;
}

/// 按类别聚合的发现结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingMap {
    pub secrets_detected: Vec<Finding>,
    pub sql_injection: Vec<Finding>,
    pub missing_auth: Vec<Finding>,
}

impl FindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, category: Category, findings: Vec<Finding>) {
        self.category_mut(category).extend(findings);
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Vec<Finding> {
        match category {
            Category::SecretsDetected => &mut self.secrets_detected,
            Category::SqlInjection => &mut self.sql_injection,
            Category::MissingAuth => &mut self.missing_auth,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Vec<Finding>)> {
        [
            (Category::SecretsDetected, &self.secrets_detected),
            (Category::SqlInjection, &self.sql_injection),
            (Category::MissingAuth, &self.missing_auth),
        ]
        .into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Finding> {
        self.secrets_detected
            .iter_mut()
            .chain(self.sql_injection.iter_mut())
            .chain(self.missing_auth.iter_mut())
    }

    pub fn total(&self) -> usize {
        self.secrets_detected.len() + self.sql_injection.len() + self.missing_auth.len()
    }
}

/// 按严重级别和类别统计的扫描摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_findings: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub secrets_detected: usize,
    pub sql_injection: usize,
    pub missing_auth: usize,
}

impl ScanSummary {
    pub fn from_findings(findings: &FindingMap) -> Self {
        let mut summary = ScanSummary {
            total_findings: findings.total(),
            secrets_detected: findings.secrets_detected.len(),
            sql_injection: findings.sql_injection.len(),
            missing_auth: findings.missing_auth.len(),
            ..ScanSummary::default()
        };

        for (_, items) in findings.iter() {
            for finding in items {
                match finding.severity {
                    Severity::Critical => summary.critical += 1,
                    Severity::High => summary.high += 1,
                    Severity::Medium => summary.medium += 1,
                    Severity::Low => summary.low += 1,
                }
            }
        }

        summary
    }
}

/// Truncate to at most `max` characters (not bytes, so multi-byte text is safe)
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
