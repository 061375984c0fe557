use crate::api::query::parse_id;
use crate::store::{NewTransaction, Transaction, TransitStore, Wallet, WalletError};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the wallet API
pub struct WalletAppState {
    pub store: Arc<TransitStore>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

/// Create wallet API router.
///
/// `:id` is a user id on the first route and a wallet id on the others.
pub fn create_wallet_router(state: Arc<WalletAppState>) -> Router {
    Router::new()
        .route("/api/wallet/:id", get(get_wallet))
        .route(
            "/api/wallet/:id/transactions",
            get(list_transactions).post(post_transaction),
        )
        .with_state(state)
}

/// GET /api/wallet/:user_id - Fetch the user's wallet, creating it if needed
async fn get_wallet(
    State(state): State<Arc<WalletAppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Wallet>, WalletApiError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(WalletApiError::BadRequest("User ID required".to_string()));
    }
    Ok(Json(state.store.wallet_for_user(user_id)))
}

/// GET /api/wallet/:wallet_id/transactions - Newest first
async fn list_transactions(
    State(state): State<Arc<WalletAppState>>,
    Path(wallet_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, WalletApiError> {
    let transactions = parse_wallet_id(&wallet_id)?
        .map(|id| state.store.transactions_for_wallet(id))
        .unwrap_or_default();
    Ok(Json(transactions))
}

/// POST /api/wallet/:wallet_id/transactions - Earn or spend tokens
///
/// Body: `{ "type": "EARN" | "SPEND", "amount": "2.50", "description": "..." }`
async fn post_transaction(
    State(state): State<Arc<WalletAppState>>,
    Path(wallet_id): Path<String>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), WalletApiError> {
    let wallet_id = parse_wallet_id(&wallet_id)?.ok_or_else(|| {
        WalletApiError::NotFound(format!("Wallet {} not found", wallet_id.trim()))
    })?;
    let Json(request) = body.map_err(|e| WalletApiError::BadRequest(e.body_text()))?;

    let transaction = state.store.post_transaction(wallet_id, request)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

fn parse_wallet_id(raw: &str) -> Result<Option<u32>, WalletApiError> {
    parse_id(raw).map_err(|_| WalletApiError::BadRequest("Invalid wallet ID".to_string()))
}

/// Wallet API error types
#[derive(Debug)]
enum WalletApiError {
    BadRequest(String),
    NotFound(String),
}

impl From<WalletError> for WalletApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::WalletNotFound(_) => WalletApiError::NotFound(e.to_string()),
            WalletError::NonPositiveAmount
            | WalletError::InsufficientBalance { .. }
            | WalletError::BalanceOverflow => WalletApiError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for WalletApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WalletApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WalletApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
