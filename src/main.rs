use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};
use log::info;

use rental_console::{api::Clients, config::Config, routes, TEMPLATES};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("FATAL: {}", e);
        e
    })?;
    let clients = Clients::new(config.http_client()?, &config.api_url);

    // parse templates before accepting requests
    lazy_static::initialize(&TEMPLATES);

    info!("Using rental API at {}", config.api_url);
    info!("Starting HTTP server on http://{}:{}/", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(routes::configure(clients.clone()))
            .default_service(web::to(routes::default_handler))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
