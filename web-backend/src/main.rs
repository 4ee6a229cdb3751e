use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ai;
mod api;
mod state;

use api::create_api_router;
use state::AppState;

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "running",
        "service": "SecAudit",
        "version": "1.0.0"
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // 从 .env 加载外部服务凭证
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secaudit_web=debug,secaudit_core=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 初始化状态
    let state = AppState::new();

    // 启动服务器
    let bind_address = "0.0.0.0:8000";
    tracing::info!("SecAudit web server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            // API 路由
            .service(create_api_router())
            // 健康检查
            .route("/health", web::get().to(health_check))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
