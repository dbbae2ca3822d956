use std::sync::Arc;

use actix_web::{web, App, HttpServer};

use clipshelf::{AppConfig, Catalog};

mod handlers;
mod render;
mod state;

use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clipshelf=info".parse().unwrap())
                .add_directive("clipshelf_web=info".parse().unwrap()),
        )
        .init();

    let cfg_path = std::env::args()
        .skip_while(|a| a != "--config")
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let cfg = match AppConfig::load(&cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load {cfg_path}: {e}");
            std::process::exit(1);
        }
    };

    let catalog = match Catalog::open(&cfg.db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to open catalog {}: {e}", cfg.db_path.display());
            std::process::exit(1);
        }
    };

    let bind_addr = cfg.listen_addr.clone();
    println!("clipshelf listening on http://{bind_addr}");

    let state = web::Data::new(AppState {
        config: Arc::new(cfg),
        catalog,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::resource("/")
                    .route(web::get().to(handlers::index))
                    .route(web::post().to(handlers::submit)),
            )
            .service(web::resource("/delete/{id}").route(web::post().to(handlers::delete)))
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
