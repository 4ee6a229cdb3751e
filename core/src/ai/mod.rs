// AI module - AI 增强
// 可注入的解释/修复能力接口；增强始终是尽力而为，绝不阻塞核心检测

pub mod cache;

pub use cache::FixCache;

use crate::scanner::{truncate_chars, FindingKind, FindingMap};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 发送给解释服务的代码摘录长度上限
pub const EXPLAIN_EXCERPT_CHARS: usize = 200;
pub const FIX_EXCERPT_CHARS: usize = 500;

/// 一条漏洞的自然语言解释
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub risk: String,
    pub exploit: String,
    pub fix: String,
}

/// 外部解释/修复服务的窄接口
///
/// Implementations are best-effort: failures surface as placeholder text,
/// never as errors. Injected into the pipeline instead of living in global
/// state, so a no-op stands in when no credential is configured.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, vulnerability: &str, code_excerpt: &str) -> Explanation;

    async fn generate_fix(&self, vulnerability: &str, code_excerpt: &str) -> String;
}

/// 未配置凭证时使用的空实现
pub struct NoopExplainer;

#[async_trait]
impl Explainer for NoopExplainer {
    async fn explain(&self, _vulnerability: &str, _code_excerpt: &str) -> Explanation {
        Explanation {
            risk: "AI explanation unavailable (no API key configured)".to_string(),
            exploit: String::new(),
            fix: String::new(),
        }
    }

    async fn generate_fix(&self, _vulnerability: &str, _code_excerpt: &str) -> String {
        String::new()
    }
}

/// 给所有发现补充 AI 解释
///
/// Additive merge only: detector-authored fields are never overwritten, and
/// enrichment fields already present are left alone.
pub async fn enhance_findings(findings: &mut FindingMap, explainer: &dyn Explainer) {
    for finding in findings.iter_mut() {
        let label = match finding.kind {
            FindingKind::MissingAuth => finding.kind.label().to_string(),
            _ => finding.subtype.clone(),
        };
        let excerpt = truncate_chars(&finding.evidence, EXPLAIN_EXCERPT_CHARS);

        let explanation = explainer.explain(&label, &excerpt).await;

        if finding.ai_risk.is_none() {
            finding.ai_risk = Some(explanation.risk);
        }
        if finding.ai_exploit.is_none() {
            finding.ai_exploit = Some(explanation.exploit);
        }
        if finding.ai_fix.is_none() {
            finding.ai_fix = Some(explanation.fix);
        }
    }
}
