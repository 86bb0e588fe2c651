use actix_web::{HttpResponse, Result, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewRecordRequest, PendingResponse};

/// Submit a new record into the pool of unconfirmed records.
#[post("/new_transaction")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewRecordRequest>,
) -> Result<HttpResponse> {
    let record = state
        .ledger
        .submit_record(&body.author, &body.content)
        .inspect_err(|e| warn!("POST /new_transaction - rejected: {e}"))?;
    debug!(
        "POST /new_transaction - accepted record from {} ({} bytes)",
        record.author,
        record.content.len()
    );
    Ok(HttpResponse::Created().json(record))
}

/// List records waiting to be mined, oldest first.
#[get("/pending_tx")]
pub async fn pending_tx(state: web::Data<AppState>) -> HttpResponse {
    let records = state.ledger.pending_records();
    HttpResponse::Ok().json(PendingResponse {
        size: records.len(),
        transactions: records,
    })
}
