//! # Quill Server
//!
//! Entry point for the blog's Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use quill_core::ports::{PasswordService, TokenService};
use quill_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod seed;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);

    tracing::info!(
        service = %config.telemetry.service_name,
        "Starting Quill server on {}:{}",
        config.host,
        config.port
    );

    config.check_jwt_secret()?;

    let state = AppState::new(&config).await?;
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    if config.seed_test_user {
        seed::seed_test_user(state.users.as_ref(), passwords.as_ref()).await?;
    }

    let state = web::Data::new(state);
    let tokens = web::Data::new(tokens);
    let passwords = web::Data::new(passwords);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(tokens.clone())
            .app_data(passwords.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
