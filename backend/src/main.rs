use actix_web::{web, App, HttpServer};
use backend::config::Config;
use backend::services;
use backend::store::ResponseStore;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let store = ResponseStore::open(&config.database_path)
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let store = web::Data::new(store);

    info!(
        "Server running at http://{}:{} (database: {})",
        config.host, config.port, config.database_path
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(1024 * 1024)) // 1 MB
            .app_data(store.clone())
            .service(services::responses::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
