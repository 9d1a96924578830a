use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use wc26_functions::cache::MatchCache;
use wc26_functions::cli::Cli;
use wc26_functions::fetcher::ReqwestFetcher;
use wc26_functions::functions;
use wc26_functions::server::{self, AppState};

#[actix_web::main]
async fn main() -> Result<()> {
    let arg = Cli::parse();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let fetcher = ReqwestFetcher::new(arg.upstream_timeout()).context("failed to build http client")?;
    let cache = Arc::new(MatchCache::new(arg.cache_ttl()));

    if arg.football().api_key.is_none() {
        tracing::warn!("FOOTBALL_API_KEY is not set, upstream calls will be unauthenticated");
    }

    let app_state = AppState::new(functions::all_functions(
        Arc::new(fetcher),
        arg.football(),
        cache,
        arg.subscription(),
    ));
    tracing::info!("Provisioned functions: {}", app_state.names().join(", "));

    let app_state = web::Data::new(app_state);

    tracing::info!("Server listening on {}:{}", arg.bind, arg.port);

    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(server::configure))
        .bind((arg.bind.as_str(), arg.port))
        .with_context(|| format!("failed to bind {}:{}", arg.bind, arg.port))?
        .run()
        .await
        .context("server terminated with an error")?;

    tracing::info!("Server stopped");

    Ok(())
}
