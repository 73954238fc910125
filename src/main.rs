#[macro_use]
extern crate diesel;

use actix_web::{middleware, web, App, HttpServer};

mod appdata;
mod articles;
mod config;
mod db;
mod extract;
mod pages;
mod seed;

use appdata::AppData;
use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::from_env(
            env_logger::Env::default().default_filter_or("actix_web=debug,bylines=trace")
        )
        .init();

    let cfg = Config::from_env().unwrap_or_else(|e| {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    });

    let data = match AppData::new(cfg) {
        Ok(data) => data,
        Err(e) => {
            log::error!("DB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    // Schema and seed run to completion before the server binds. Failures are
    // logged, not fatal; requests that need the missing tables fail on their
    // own later.
    let mut db = data.db.clone();
    if let Err(e) = db.ensure_schema().await {
        log::error!("Could not create tables: {}", e);
    } else if let Err(e) = seed::run(&mut db, &data.cfg.seed_file).await {
        log::error!("Could not seed the database: {}", e);
    }

    let host = data.cfg.http_host.clone();
    let port = data.cfg.http_port;

    let server = HttpServer::new(move || {
            App::new()
                .data(data.clone())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(articles::service())
                .route("/new", web::get().to(pages::new_article))
                .service(actix_files::Files::new("/", data.cfg.public_dir.clone()))
        })
        .bind((host.as_str(), port))?
        .run();

    log::info!("Started http server: http://{}:{}", host, port);

    server.await
}
