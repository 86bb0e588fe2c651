use actix_web::{HttpResponse, Result, route, web};
use log::info;

use super::models::{AppState, MineResponse};

/// Mine the pooled records into a new block.
///
/// The nonce search runs on the blocking pool so request workers stay free.
/// Afterwards the node syncs with its peers; if it kept its own chain the
/// new block is announced to all of them.
#[route("/mine", method = "GET", method = "POST")]
pub async fn mine(state: web::Data<AppState>) -> Result<HttpResponse> {
    let worker = state.clone();
    let block = web::block(move || worker.ledger.mine()).await??;

    if state.peers.is_empty() {
        info!("MINER - block #{} kept locally (no peers)", block.index);
    } else if !state.client.sync_with_peers(&state.ledger, &state.peers).await {
        state.client.announce_to_all(&state.peers, &block).await;
    }

    Ok(HttpResponse::Ok().json(MineResponse {
        index: block.index,
        hash: block.hash.clone(),
        nonce: block.nonce,
        difficulty: state.ledger.difficulty(),
        records: block.records.len(),
    }))
}
