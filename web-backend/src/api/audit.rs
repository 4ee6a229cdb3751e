use actix_web::{web, HttpResponse, Responder};
use secaudit_core::{
    audit_repository, scan_snippet, truncate_chars, AuditReport, FixCache, FIX_EXCERPT_CHARS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::state::AppState;

/// 克隆阶段的硬超时
const CLONE_TIMEOUT: Duration = Duration::from_secs(60);

/// 整个扫描管线的粗粒度外层超时
const SCAN_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub repo_url: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub scan_id: String,
    pub started_at: String,
    #[serde(flatten)]
    pub report: AuditReport,
}

#[derive(Deserialize)]
pub struct SnippetRequest {
    pub code: String,
    pub filename: String,
}

#[derive(Deserialize)]
pub struct FixRequest {
    pub vulnerability: String,
    pub code_snippet: String,
}

#[derive(Serialize)]
pub struct FixResponse {
    pub fixed_code: String,
    pub cached: bool,
}

pub fn configure_audit_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/analyze", web::post().to(analyze_repo))
        .route("/snippet", web::post().to(analyze_snippet))
        .route("/fix", web::post().to(generate_fix));
}

/// 审计一个 GitHub 仓库
///
/// 获取失败是唯一返回请求级错误的路径，并且只带一条通用消息；克隆成功
/// 之后的任何内部问题都会以部分报告的形式返回。
pub async fn analyze_repo(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> impl Responder {
    // 有界的扫描并发：拿不到许可说明信号量已关闭，只会在进程退出时发生
    let _permit = match state.scan_permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            return HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Scanner is shutting down"
            }));
        }
    };

    let scan_id = Uuid::new_v4().to_string();
    let started_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    tracing::info!("scan {} started for {}", scan_id, req.repo_url);

    let result = tokio::time::timeout(
        SCAN_TIMEOUT,
        audit_repository(
            &req.repo_url,
            &state.budget,
            state.explainer.as_ref(),
            CLONE_TIMEOUT,
        ),
    )
    .await;

    match result {
        Ok(Ok(report)) => {
            tracing::info!(
                "scan {} completed: {} findings in {} files",
                scan_id,
                report.summary.total_findings,
                report.files_scanned
            );
            HttpResponse::Ok().json(AnalyzeResponse {
                scan_id,
                started_at,
                report,
            })
        }
        Ok(Err(e)) => {
            // 不透传底层 git 诊断
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Err(_) => {
            tracing::error!("scan {} timed out for {}", scan_id, req.repo_url);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Scan timed out"
            }))
        }
    }
}

/// 扫描一段贴入的代码
pub async fn analyze_snippet(req: web::Json<SnippetRequest>) -> impl Responder {
    let report = scan_snippet(&req.code, &req.filename).await;
    HttpResponse::Ok().json(report)
}

/// 为一条漏洞生成修复建议（经过有界 LRU 缓存）
pub async fn generate_fix(
    state: web::Data<AppState>,
    req: web::Json<FixRequest>,
) -> impl Responder {
    let excerpt = truncate_chars(&req.code_snippet, FIX_EXCERPT_CHARS);
    let key = FixCache::key(&req.vulnerability, &excerpt);

    if let Some(cached) = state.fix_cache.lock().await.get(&key) {
        return HttpResponse::Ok().json(FixResponse {
            fixed_code: cached,
            cached: true,
        });
    }

    let fixed_code = state
        .explainer
        .generate_fix(&req.vulnerability, &excerpt)
        .await;

    if !fixed_code.is_empty() {
        state.fix_cache.lock().await.insert(key, fixed_code.clone());
    }

    HttpResponse::Ok().json(FixResponse {
        fixed_code,
        cached: false,
    })
}
