use actix_web::{HttpRequest, HttpResponse, Result, get, post, web};
use log::{info, warn};

use super::models::{
    AppState, ChainResponse, ConsensusResponse, RegisterNodeRequest, RegisterWithResponse,
};
use crate::blockchain::Block;
use crate::consensus;
use crate::peers::registry::normalize;

fn chain_dump(state: &AppState) -> ChainResponse {
    let chain = state.ledger.chain();
    ChainResponse {
        length: chain.len(),
        chain,
        peers: state.peers.snapshot(),
    }
}

/// Get the full blockchain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(chain_dump(&state))
}

/// A peer announces itself; reply with our chain so it can sync.
#[post("/register_node")]
pub async fn register_node(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodeRequest>,
) -> Result<HttpResponse> {
    if state.peers.register(&body.node_address)? {
        info!("PEERS - registered {}", body.node_address.trim());
    }
    Ok(HttpResponse::Ok().json(chain_dump(&state)))
}

/// Register this node with `node_address`, then sync with its chain and
/// adopt its peer list.
#[post("/register_with")]
pub async fn register_with(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RegisterNodeRequest>,
) -> Result<HttpResponse> {
    let remote = normalize(&body.node_address)?;
    let own_address = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };

    let dump = state.client.register_with(&remote, &own_address).await?;
    let adopted = consensus::consider_chain(&state.ledger, dump.chain);

    state.peers.register(&remote)?;
    state.peers.extend(dump.peers, Some(&own_address));
    info!(
        "PEERS - registered with {remote} (adopted={adopted}, known peers={})",
        state.peers.len()
    );

    Ok(HttpResponse::Ok().json(RegisterWithResponse {
        adopted,
        length: state.ledger.len(),
        peers: state.peers.snapshot(),
    }))
}

/// Accept a block mined by a peer. Its `hash` field is the proof.
#[post("/add_block")]
pub async fn add_block(
    state: web::Data<AppState>,
    body: web::Json<Block>,
) -> Result<HttpResponse> {
    let block = body.into_inner();
    let proof = block.hash.clone();
    let appended = state
        .ledger
        .append_block(block, &proof)
        .inspect_err(|e| warn!("POST /add_block - block discarded: {e}"))?;
    info!("PEERS - accepted block #{} from a peer", appended.index);
    Ok(HttpResponse::Created().json(appended))
}

/// Pull every peer's chain and adopt the longest valid one.
#[post("/consensus")]
pub async fn run_consensus(state: web::Data<AppState>) -> HttpResponse {
    let adopted = state.client.sync_with_peers(&state.ledger, &state.peers).await;
    HttpResponse::Ok().json(ConsensusResponse {
        adopted,
        length: state.ledger.len(),
    })
}
