mod bitbucket;
mod bitbucket_server;
mod config;
mod event;
mod github;
mod gitlab;
mod health;
mod hooks;
mod http;
mod sanitize;
mod signature;

use actix_web::{middleware::Logger, web, App, HttpServer};
use color_eyre::eyre;

#[actix_web::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(tracing_subscriber::fmt().finish())?;

    let config::Config {
        bind,
        webhook_secret,
        payload_limit,
    } = envy::prefixed("PUSHGATE_").from_env()?;

    let health_body = web::Data::new(health::HealthBody::new());

    tracing::info!(bind = bind.as_str(), "Listening on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(health_body.clone())
            .app_data(http::WebhookConfig::new(webhook_secret.clone()))
            .app_data(web::PayloadConfig::new(payload_limit))
            .wrap(Logger::default())
            .route("/health", web::get().to(health::show))
            .configure(hooks::configure)
    })
    .bind(&bind)?
    .run()
    .await
    .map_err(Into::into)
}
