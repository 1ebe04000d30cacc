mod config;
mod db;
mod services;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = config::AppConfig::from_env();

    // Create the schema up front so per-request connections find it in place.
    db::open(&config.database)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let bind = (config.host.clone(), config.port);
    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .service(services::office_bearers::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
