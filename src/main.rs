use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod external;
mod model;
mod models;
mod payroll;
mod routes;
mod store;
mod utils;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::external::geocode::Geocoder;
use crate::external::sms::SmsChannel;
use crate::utils::punch_filter;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance & Payroll Portal"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    // Seed the shared admin credential on first boot
    let default_hash = auth::password::hash_secret(&config.admin_default_password);
    match store::admin::bootstrap(&pool, &default_hash).await {
        Ok(true) => info!("Admin credential bootstrapped with the default password"),
        Ok(false) => {}
        Err(e) => error!(error = %e, "Failed to bootstrap admin credential"),
    }

    let pool_for_filter_warmup = pool.clone();
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    actix_web::rt::spawn(async move {
        let today = chrono::Local::now().date_naive();
        if let Err(e) = punch_filter::warmup_punch_filter(&pool_for_filter_warmup, today, 250).await
        {
            eprintln!("Failed to warmup punch filter: {:?}", e);
        }
    });

    let geocoder = Geocoder::new(config.geocode_base_url.clone());
    let sms = SmsChannel::new(config.sms_gateway_url.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(geocoder.clone()))
            .app_data(Data::new(sms.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
