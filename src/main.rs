// src/main.rs
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use numviz::api::{configure_routes, AppState};
use numviz::{banner, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded ({}), using process environment", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let bind = app_config.bind.clone();
    log::info!(
        "Relaying /api/visualize to {}",
        app_config.upstream_visualize_url()
    );

    let state = AppState::new(app_config).map_err(std::io::Error::other)?;

    println!("🚀 Starting relay on http://{}", bind);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind.as_str())?
    .run()
    .await
}
