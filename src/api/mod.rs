mod chain;
mod health;
mod mining;
pub mod models;
mod tx;

use actix_web::http::StatusCode;
use actix_web::web::ServiceConfig;
use actix_web::{HttpResponse, ResponseError};

use crate::error::LedgerError;
pub use models::AppState;
use models::ErrorResponse;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(tx::new_transaction)
        .service(tx::pending_tx)
        .service(chain::get_chain)
        .service(chain::register_node)
        .service(chain::register_with)
        .service(chain::add_block)
        .service(chain::run_consensus)
        .service(mining::mine);
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) | LedgerError::InvalidProof | LedgerError::NothingToMine => {
                StatusCode::BAD_REQUEST
            }
            LedgerError::PreviousHashMismatch { .. } => StatusCode::CONFLICT,
            LedgerError::PeerUnreachable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::json;
    use std::time::Duration;

    use super::init_routes;
    use super::models::{
        AppState, ChainResponse, ConsensusResponse, ErrorResponse, MineResponse, PendingResponse,
        RegisterWithResponse,
    };
    use crate::blockchain::{Block, Ledger, pow};
    use crate::config::Config;
    use crate::record::Record;

    fn state(difficulty: u32) -> web::Data<AppState> {
        web::Data::new(AppState::new(&Config {
            difficulty,
            peer_timeout: Duration::from_secs(1),
            ..Config::default()
        }))
    }

    /// Serve `data` on a real port and return the server with its base URL.
    fn spawn_node(data: web::Data<AppState>) -> (actix_test::TestServer, String) {
        let srv = actix_test::start(move || {
            App::new()
                .app_data(data.clone())
                .configure(init_routes)
        });
        let address = format!("http://{}", srv.addr());
        (srv, address)
    }

    fn grow(ledger: &Ledger, len: usize) {
        while ledger.len() < len {
            ledger
                .submit_record("remote", &format!("block {}", ledger.len()))
                .unwrap();
            ledger.mine().unwrap();
        }
    }

    #[actix_web::test]
    async fn submit_mine_and_read_chain() {
        let data = state(2);
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/new_transaction")
            .set_json(json!({"author": "alice", "content": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/pending_tx").to_request();
        let pending: PendingResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pending.size, 1);
        assert_eq!(pending.transactions[0].author, "alice");

        let req = test::TestRequest::post().uri("/mine").to_request();
        let mined: MineResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mined.index, 1);
        assert_eq!(mined.records, 1);
        assert!(mined.hash.starts_with("00"));

        let req = test::TestRequest::get().uri("/chain").to_request();
        let dump: ChainResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(dump.length, 2);
        assert_eq!(dump.chain[1].previous_hash, Block::genesis().hash);
        assert_eq!(dump.chain[1].records[0].content, "hello");
        assert!(data.ledger.pending_records().is_empty());
    }

    #[actix_web::test]
    async fn blank_author_is_bad_request() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/new_transaction")
            .set_json(json!({"author": "", "content": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.contains("author"));
    }

    #[actix_web::test]
    async fn mining_empty_pool_is_rejected() {
        let app = test::init_service(App::new().app_data(state(1)).configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/mine").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn add_block_checks_linkage_and_proof() {
        let data = state(1);
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        let mut stale = Block::candidate(1, "deadbeef".into(), Vec::new());
        stale.hash = pow::mine(&mut stale, 1);
        let req = test::TestRequest::post()
            .uri("/add_block")
            .set_json(&stale)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let mut unproven = Block::candidate(1, Block::genesis().hash, Vec::new());
        unproven.hash = "0".repeat(64);
        let req = test::TestRequest::post()
            .uri("/add_block")
            .set_json(&unproven)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let mut skipped = Block::candidate(42, Block::genesis().hash, Vec::new());
        skipped.hash = pow::mine(&mut skipped, 1);
        let req = test::TestRequest::post()
            .uri("/add_block")
            .set_json(&skipped)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let nameless = Record {
            author: String::new(),
            content: "hi".into(),
            created_at: 1.0,
        };
        let mut anonymous = Block::candidate(1, Block::genesis().hash, vec![nameless]);
        anonymous.hash = pow::mine(&mut anonymous, 1);
        let req = test::TestRequest::post()
            .uri("/add_block")
            .set_json(&anonymous)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(data.ledger.len(), 1);

        let mut good = Block::candidate(1, Block::genesis().hash, Vec::new());
        good.hash = pow::mine(&mut good, 1);
        let req = test::TestRequest::post()
            .uri("/add_block")
            .set_json(&good)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        assert_eq!(data.ledger.len(), 2);
    }

    #[actix_web::test]
    async fn register_node_adds_peer_and_returns_chain() {
        let data = state(1);
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/register_node")
                .set_json(json!({"node_address": "http://127.0.0.1:8001/"}))
                .to_request();
            let dump: ChainResponse = test::call_and_read_body_json(&app, req).await;
            assert_eq!(dump.length, 1);
            assert_eq!(dump.peers, vec!["http://127.0.0.1:8001"]);
        }
        assert_eq!(data.peers.len(), 1);

        let req = test::TestRequest::post()
            .uri("/register_node")
            .set_json(json!({"node_address": " "}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn register_with_unreachable_peer_is_bad_gateway() {
        let data = state(1);
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/register_with")
            .set_json(json!({"node_address": "http://127.0.0.1:1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(data.peers.is_empty());
    }

    #[actix_web::test]
    async fn consensus_skips_unreachable_peers() {
        let data = state(1);
        data.peers.register("http://127.0.0.1:1").unwrap();
        let app =
            test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post().uri("/consensus").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["adopted"], false);
        assert_eq!(body["length"], 1);
    }

    #[actix_web::test]
    async fn register_with_adopts_longer_chain_and_merges_peers() {
        let remote = state(1);
        grow(&remote.ledger, 3);
        remote.peers.register("http://10.0.0.9:8000").unwrap();
        let (_srv, remote_address) = spawn_node(remote.clone());

        let local = state(1);
        let app =
            test::init_service(App::new().app_data(local.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/register_with")
            .set_json(json!({ "node_address": remote_address }))
            .to_request();
        let body: RegisterWithResponse = test::call_and_read_body_json(&app, req).await;

        assert!(body.adopted);
        assert_eq!(body.length, 3);
        assert_eq!(local.ledger.chain(), remote.ledger.chain());
        assert_eq!(body.peers.len(), 2);
        assert!(body.peers.contains(&remote_address));
        assert!(body.peers.contains(&"http://10.0.0.9:8000".to_string()));
        // the remote learned about us
        assert_eq!(remote.peers.len(), 2);
    }

    #[actix_web::test]
    async fn consensus_adopts_longer_peer_chain() {
        let remote = state(1);
        grow(&remote.ledger, 4);
        let (_srv, remote_address) = spawn_node(remote.clone());

        let local = state(1);
        grow(&local.ledger, 2);
        local.peers.register(&remote_address).unwrap();
        let app =
            test::init_service(App::new().app_data(local.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post().uri("/consensus").to_request();
        let body: ConsensusResponse = test::call_and_read_body_json(&app, req).await;

        assert!(body.adopted);
        assert_eq!(body.length, 4);
        assert_eq!(local.ledger.chain(), remote.ledger.chain());
    }

    #[actix_web::test]
    async fn mined_block_is_announced_to_peers() {
        let remote = state(1);
        let (_srv, remote_address) = spawn_node(remote.clone());

        let local = state(1);
        local.peers.register(&remote_address).unwrap();
        local.ledger.submit_record("alice", "hello").unwrap();
        let app =
            test::init_service(App::new().app_data(local.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post().uri("/mine").to_request();
        let mined: MineResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(mined.index, 1);
        assert_eq!(local.ledger.len(), 2);
        assert_eq!(remote.ledger.len(), 2);
        assert_eq!(remote.ledger.last_block().hash, mined.hash);
        assert!(remote.ledger.pending_records().is_empty());
    }

    #[actix_web::test]
    async fn mining_yields_to_a_longer_peer_chain() {
        let remote = state(1);
        grow(&remote.ledger, 4);
        let (_srv, remote_address) = spawn_node(remote.clone());

        let local = state(1);
        local.peers.register(&remote_address).unwrap();
        local.ledger.submit_record("alice", "hello").unwrap();
        let app =
            test::init_service(App::new().app_data(local.clone()).configure(init_routes)).await;
        let req = test::TestRequest::post().uri("/mine").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(local.ledger.chain(), remote.ledger.chain());
        assert_eq!(remote.ledger.len(), 4);
    }
}
