use actix_web::{web, Scope};

pub mod audit;

pub fn create_api_router() -> Scope {
    web::scope("/api").service(audit_routes())
}

fn audit_routes() -> Scope {
    web::scope("/audit").configure(audit::configure_audit_routes)
}
