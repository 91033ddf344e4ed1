use std::io;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use crate::handlers;
use crate::state::AppState;

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health::handler))
            .route("/rules/generate", web::post().to(handlers::rules::handler))
            .route("/video/analyze", web::post().to(handlers::video::handler)),
    );
}

/// Body size limits for every extractor a submission can go through.
///
/// `Either` buffers the raw payload before trying JSON or form decoding, so the raw
/// payload limit has to be raised too.
pub fn payload_config(max_upload_bytes: usize) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(
                web::JsonConfig::default()
                    .limit(max_upload_bytes)
                    .error_handler(handlers::json_error_handler),
            )
            .app_data(web::FormConfig::default().limit(max_upload_bytes));
    }
}

pub async fn run(host: &str, port: u16, state: AppState) -> io::Result<()> {
    let limits = payload_config(state.max_upload_bytes);
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(limits.clone())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind((host, port))?
    .run();

    log::info!("Vision EHS server listening on http://{host}:{port}");

    server.await
}
