use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use std::io;

use peerledger::api::{self, AppState};
use peerledger::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let state = web::Data::new(AppState::new(&config));
    if !config.bootstrap_peers.is_empty() {
        let own_address = format!("http://{}:{}", config.host, config.port);
        state.peers.extend(&config.bootstrap_peers, Some(&own_address));
        state.client.sync_with_peers(&state.ledger, &state.peers).await;
    }

    info!(
        "⛓️ Starting ledger node at http://{}:{} (difficulty={}, peers={})",
        config.host,
        config.port,
        config.difficulty,
        state.peers.len()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
