//! Tournament manager REST server. State is kept in memory for the life of the process.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; override with env HOST, PORT (see `config`).

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use std::sync::RwLock;
use tournament_manager::{api, ServerConfig, Tournament};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!(
        "Scheduling defaults: {} courts, {} minute matches; match codes valid {}h",
        config.default_num_courts,
        config.default_match_duration_minutes,
        config.match_code_ttl().num_hours()
    );

    let state = Data::new(RwLock::new(Tournament::new()));
    let config_data = Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config_data.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
