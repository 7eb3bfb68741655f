//! # REST API
//!
//! Builds the axum router for the notarization service. All handlers share
//! the [`Notary`] through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                          |
//! |--------|-------------------------------|--------------------------------------|
//! | GET    | `/`                           | Welcome message (404)                |
//! | POST   | `/requestValidation`          | Issue or reuse a challenge           |
//! | POST   | `/message-signature/validate` | Answer a challenge                   |
//! | POST   | `/block`                      | Notarize a star                      |
//! | GET    | `/block/:height`              | Block by height                      |
//! | GET    | `/stars/address::address`     | Star blocks by address               |
//! | GET    | `/stars/hash::hash`           | Block by hash                        |
//! | GET    | `/chain/validate`             | Heights failing the integrity audit  |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use star_notary::core::{validate_address, validate_signature, StarSubmission, ValidationError};
use star_notary::store::SqliteStore;
use star_notary::{Notary, NotaryError, ValidationRequest};

const WELCOME: &str = "Welcome to Star Notarization Service.";
const NO_BLOCK_AT_HEIGHT: &str = "Oops! No Block found for the given height.";
const NO_BLOCK_FOR_ADDRESS: &str = "Oops! No Block found for the given address.";
const NO_BLOCK_FOR_HASH: &str = "Oops! No Block found for the Hash Value";

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub notary: Arc<Notary<SqliteStore>>,
}

impl AppState {
    pub fn new(notary: Notary<SqliteStore>) -> Self {
        Self {
            notary: Arc::new(notary),
        }
    }
}

/// Builds the axum [`Router`] with all routes, CORS, and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/requestValidation", post(request_validation_handler))
        .route("/message-signature/validate", post(validate_signature_handler))
        .route("/block", post(submit_star_handler))
        .route("/block/:height", get(block_by_height_handler))
        .route("/stars/:query", get(stars_handler))
        .route("/chain/validate", get(validate_chain_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /requestValidation`.
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address: Option<String>,
}

/// Body of `POST /message-signature/validate`.
#[derive(Debug, Deserialize)]
pub struct SignatureRequest {
    pub address: Option<String>,
    pub signature: Option<String>,
}

/// Star fields as sent by a client. Missing fields are reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct StarFields {
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub mag: Option<String>,
    pub con: Option<String>,
    pub story: Option<String>,
}

/// Body of `POST /block`.
#[derive(Debug, Deserialize)]
pub struct StarRequest {
    pub address: Option<String>,
    pub star: Option<StarFields>,
}

/// Challenge returned by `POST /requestValidation`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub address: String,
    pub message: String,
    pub request_time_stamp: i64,
    pub validation_window: i64,
}

impl From<ValidationRequest> for ChallengeResponse {
    fn from(request: ValidationRequest) -> Self {
        Self {
            address: request.address,
            message: request.message,
            request_time_stamp: request.request_time_stamp,
            validation_window: request.validation_window,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

/// Audit result of `GET /chain/validate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainReport {
    pub errors: Vec<u64>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An HTTP error: status plus client-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Keep the status of `err` but replace a not-found message.
    fn or_not_found(err: NotaryError, message: &str) -> Self {
        if err.is_not_found() {
            Self::not_found(message)
        } else {
            err.into()
        }
    }
}

impl From<NotaryError> for ApiError {
    fn from(err: NotaryError) -> Self {
        let status = match &err {
            NotaryError::Validation(_) => StatusCode::BAD_REQUEST,
            NotaryError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            NotaryError::BlockNotFound(_) | NotaryError::RequestNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            NotaryError::Store(_) | NotaryError::Core(_) => {
                tracing::error!(error = %err, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /` — there is nothing here; answer 404 with a greeting.
async fn root_handler() -> ApiError {
    ApiError::not_found(WELCOME)
}

/// `POST /requestValidation` — issue a challenge or return the live one.
async fn request_validation_handler(
    State(state): State<AppState>,
    body: Result<Json<AddressRequest>, JsonRejection>,
) -> ApiResult<Json<ChallengeResponse>> {
    let Json(body) = body?;
    let address = validate_address(body.address.as_deref())?;

    let request = state.notary.registry().request_validation(address).await?;
    Ok(Json(request.into()))
}

/// `POST /message-signature/validate` — 200 when the signature admits the
/// address, 401 with the same body otherwise.
async fn validate_signature_handler(
    State(state): State<AppState>,
    body: Result<Json<SignatureRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body?;
    let address = validate_address(body.address.as_deref())?;
    let signature = validate_signature(body.signature.as_deref())?;

    let outcome = state
        .notary
        .registry()
        .validate_message_signature(address, signature)
        .await?;

    let status = if outcome.register_star {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    Ok((status, Json(outcome)).into_response())
}

/// `POST /block` — notarize a star for a validated address.
async fn submit_star_handler(
    State(state): State<AppState>,
    body: Result<Json<StarRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body?;
    let address = validate_address(body.address.as_deref())?;
    let star = body.star.ok_or(ValidationError::MissingStar)?;

    let submission = StarSubmission::with_story_limit(
        star.ra.unwrap_or_default(),
        star.dec.unwrap_or_default(),
        star.mag.unwrap_or_default(),
        star.con.unwrap_or_default(),
        star.story.unwrap_or_default(),
        state.notary.config().max_story_bytes,
    )?;

    let block = state.notary.submit_star(address, submission).await?;
    Ok((StatusCode::CREATED, Json(block)).into_response())
}

/// `GET /block/:height` — the block as stored.
async fn block_by_height_handler(
    Path(height): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let height: u64 = height
        .parse()
        .map_err(|_| ApiError::not_found(NO_BLOCK_AT_HEIGHT))?;

    let block = state
        .notary
        .blockchain()
        .get_block(height)
        .await
        .map_err(|e| ApiError::or_not_found(e, NO_BLOCK_AT_HEIGHT))?;
    Ok(Json(block).into_response())
}

/// `GET /stars/address:{address}` and `GET /stars/hash:{hash}`.
async fn stars_handler(
    Path(query): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Response> {
    let chain = state.notary.blockchain();

    if let Some(address) = query.strip_prefix("address:") {
        let blocks = chain.get_blocks_by_address(address).await?;
        if blocks.is_empty() {
            return Err(ApiError::not_found(NO_BLOCK_FOR_ADDRESS));
        }
        return Ok(Json(blocks).into_response());
    }

    if let Some(hash) = query.strip_prefix("hash:") {
        let block = chain
            .get_block_by_hash(hash)
            .await
            .map_err(|e| ApiError::or_not_found(e, NO_BLOCK_FOR_HASH))?;
        return Ok(Json(block).into_response());
    }

    Err(ApiError::not_found(NO_BLOCK_FOR_HASH))
}

/// `GET /chain/validate` — heights whose hash or link check fails.
async fn validate_chain_handler(State(state): State<AppState>) -> ApiResult<Json<ChainReport>> {
    let errors = state.notary.blockchain().validate_chain().await?;
    Ok(Json(ChainReport { errors }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
