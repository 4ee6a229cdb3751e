// SecAudit Core Library
// 核心功能库，包含仓库采样器、三类漏洞检测器和并发编排层

pub mod ai;
pub mod audit;
pub mod patterns;
pub mod repo;
pub mod sampler;
pub mod scanner;

// 重新导出常用类型
pub use ai::{
    enhance_findings, Explainer, Explanation, FixCache, NoopExplainer, EXPLAIN_EXCERPT_CHARS,
    FIX_EXCERPT_CHARS,
};
pub use audit::{audit_repository, scan_snippet, AuditReport, SnippetReport};
pub use repo::{fetch_repository, ClonedRepo, FetchError};
pub use sampler::{sample_repository, FileSample, ScanBudget};
pub use scanner::manager::ScannerManager;
pub use scanner::{
    truncate_chars, Category, CodeFile, Finding, FindingKind, FindingMap, ScanSummary, Scanner,
    Severity,
};

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CoreError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Walk error: {0}")]
        Walk(String),
    }

    pub type Result<T> = std::result::Result<T, CoreError>;
}
