// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::resource("/visualize")
                    .route(web::post().to(handlers::relay_visualize))
                    .default_service(web::to(handlers::method_not_allowed)),
            ),
    );
}
