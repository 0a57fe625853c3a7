//! Single binary web server: JSON API for tournaments, matches, scores, disputes and rankings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Requests act as the user named by the `X-User-Id` header; register users via POST /api/users.

use actix_web::{middleware::Logger, App, HttpServer};
use tennis_tournament_web::{http, ServerConfig, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = http::new_state(Store::new());

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(http::configure)
    })
    .bind(config.bind_addr())?
    .run()
    .await
}
